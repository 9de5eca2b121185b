use clap::{Args, Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "kafka-tool")]
#[command(author)]
#[command(version)]
#[command(propagate_version = true)]
#[command(about = "ubiquitous tool to work with kafka and schema registry", long_about = None)]
pub struct Cli {
    /// environment to work with
    #[arg(short, long)]
    pub env: String,
    #[clap(value_enum, default_value_t=LogOutput::StdOut)]
    #[arg(short, long)]
    pub log_output: LogOutput,
    #[command(subcommand)]
    pub action: Action,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum LogOutput {
    StdOut,
    StdErr,
}

#[derive(clap::Subcommand, Debug)]
pub enum Action {
    /// sets new offsets for a consumer group
    #[command(visible_alias = "setgo")]
    SetGroupOffset(SetGroupOffsetArgs),
    /// resets offset of given groupId (earliest | latest by default)
    #[command(visible_alias = "ro")]
    ResetOffset(ResetOffsetArgs),
    /// display group offsets per partition
    #[command(visible_alias = "sgo")]
    ShowGroupOffset(ShowGroupOffsetArgs),
    /// sets config with credentials for kafka and schema registry
    SetConfig(SetConfigArgs),
    /// displays config with credentials
    GetConfig,
    /// delete all items in config by env
    ClearConfig,
    /// list all topics in kafka
    #[command(visible_alias = "lt")]
    ListTopics,
    /// show all options about given topic
    #[command(visible_alias = "st")]
    ShowTopic(ShowTopicArgs),
    /// create new topic
    #[command(visible_alias = "ct")]
    CreateTopic(CreateTopicArgs),
    /// deletes topic by name
    #[command(visible_alias = "dt")]
    DeleteTopic(DeleteTopicArgs),
    /// deletes all messages in the given topic
    #[command(visible_alias = "dtm")]
    DeleteTopicMessages(DeleteTopicMessagesArgs),
    /// list all groups in kafka
    #[command(visible_alias = "lg")]
    ListGroups,
    /// get info about cluster
    #[command(visible_alias = "dc")]
    DescribeCluster,
    /// list all schemas in schema registry
    #[command(visible_alias = "ls")]
    ListSchemas(ListSchemasArgs),
    /// deletes schema in schema registry
    #[command(visible_alias = "ds")]
    DeleteSchema(DeleteSchemaArgs),
}

#[derive(Args, Debug)]
pub struct SetGroupOffsetArgs {
    /// group id
    #[arg(long)]
    pub group_id: String,
    /// name of the topic
    #[arg(long)]
    pub topic: String,
    /// sets new offsets for the group in ISO8601 format
    #[arg(long = "timestampISO")]
    pub timestamp_iso: Option<String>,
    /// sets new offsets for the group in Unix format (milliseconds)
    #[arg(long = "timestampUnix")]
    pub timestamp_unix: Option<String>,
    /// list of pairs partition=offset, e.g. "0=100,1=200"
    #[arg(long)]
    pub offsets: Option<String>,
    /// displays what operations will be applied but does not apply anything
    #[arg(long)]
    pub dry: bool,
}

#[derive(Args, Debug)]
pub struct ResetOffsetArgs {
    /// group id
    #[arg(long)]
    pub group_id: String,
    /// name of the topic
    #[arg(long)]
    pub topic: String,
    /// reset offset to the earliest instead of the latest
    #[arg(long)]
    pub earliest: bool,
}

#[derive(Args, Debug)]
pub struct ShowGroupOffsetArgs {
    /// group id
    pub group_id: String,
    /// filter by topics (comma-separated)
    #[arg(short, long)]
    pub topics: Option<String>,
}

#[derive(Args, Debug)]
pub struct SetConfigArgs {
    /// json config with credentials
    pub json: String,
}

#[derive(Args, Debug)]
pub struct ShowTopicArgs {
    /// name of topic
    pub topic: String,
    /// also display topic config entries
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Args, Debug)]
pub struct CreateTopicArgs {
    /// topic name to create
    pub topic: String,
    /// number of partitions
    #[arg(short = 'n', long, default_value_t = 1)]
    pub partitions_num: i32,
    /// replication factor for every partition
    #[arg(long)]
    pub replication_factor: i32,
    /// assigns partitions to replicas, e.g. [{"partition": 0, "replicas": [0,1,2]}]
    #[arg(long, default_value = "[]")]
    pub replica_assignment: String,
    /// extra topic config entries, e.g. {"cleanup.policy": "compact"}
    #[arg(long, default_value = "{}")]
    pub config_entries: String,
}

#[derive(Args, Debug)]
pub struct DeleteTopicArgs {
    /// topic name to delete
    pub topic: String,
    /// timeout for the delete command in milliseconds
    #[arg(long, default_value_t = 5000)]
    pub timeout: i32,
}

#[derive(Args, Debug)]
pub struct DeleteTopicMessagesArgs {
    /// name of the topic
    pub topic: String,
}

#[derive(Args, Debug)]
pub struct ListSchemasArgs {
    /// get schemas that match the given name
    pub name: Option<String>,
    /// display only subject names (aka schema names)
    #[arg(long)]
    pub names_only: bool,
    /// display only the schema itself
    #[arg(long)]
    pub schemas_only: bool,
    /// keep the schema as a string instead of parsed json
    #[arg(long)]
    pub stringify_schema: bool,
    /// get first matched document from array
    #[arg(long)]
    pub one: bool,
}

#[derive(Args, Debug)]
pub struct DeleteSchemaArgs {
    /// schema name to be deleted
    pub schema: String,
    /// schema by version to be deleted
    #[arg(long)]
    pub version: Option<u32>,
    /// deletes schema permanently
    #[arg(long)]
    pub permanent: bool,
}
