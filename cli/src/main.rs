use clap::Parser;
use env_logger::{Builder, Target};

mod commands;

#[tokio::main]
async fn main() {
    let cli = args::Cli::parse();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }

    let mut builder = Builder::from_default_env();
    match cli.log_output {
        args::LogOutput::StdOut => {
            builder.target(Target::Stdout);
        }
        args::LogOutput::StdErr => {
            builder.target(Target::Stderr);
        }
    }
    builder.init();

    // Every failure path funnels through here; the exit code is decided in
    // exactly one place.
    if let Err(err) = run(cli).await {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: args::Cli) -> anyhow::Result<()> {
    let env = cli.env;
    match cli.action {
        args::Action::SetConfig(opts) => commands::config::set(&env, &opts.json),
        args::Action::GetConfig => commands::config::get(&env),
        args::Action::ClearConfig => commands::config::clear(&env),
        action => {
            let config = commands::load_config(&env)?;
            match action {
                args::Action::ListSchemas(opts) => commands::schemas::list(&config, &opts).await,
                args::Action::DeleteSchema(opts) => commands::schemas::delete(&config, &opts).await,
                action => {
                    let admin = kafka_admin::KafkaAdmin::from_config(&config)?;
                    match action {
                        args::Action::SetGroupOffset(opts) => {
                            commands::set_group_offset::run(&admin, &opts)
                                .await
                                .map(|_| ())
                        }
                        args::Action::ResetOffset(opts) => {
                            commands::reset_offset::run(&admin, &opts).await.map(|_| ())
                        }
                        args::Action::ShowGroupOffset(opts) => {
                            commands::show_group_offset::run(
                                &admin,
                                &opts.group_id,
                                opts.topics.as_deref(),
                            )
                            .await
                            .map(|_| ())
                        }
                        args::Action::ListTopics => commands::topics::list(&admin).await,
                        args::Action::ShowTopic(opts) => commands::topics::show(&admin, &opts).await,
                        args::Action::CreateTopic(opts) => {
                            commands::topics::create(&admin, &opts).await
                        }
                        args::Action::DeleteTopic(opts) => {
                            commands::topics::delete(&admin, &opts).await
                        }
                        args::Action::DeleteTopicMessages(opts) => {
                            commands::topics::delete_messages(&admin, &opts).await
                        }
                        args::Action::ListGroups => commands::groups::list(&admin).await,
                        args::Action::DescribeCluster => commands::cluster::describe(&admin).await,
                        _ => unreachable!("config and schema actions are handled above"),
                    }
                }
            }
        }
    }
}
