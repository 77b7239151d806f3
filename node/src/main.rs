use contract_gateway::{
    api::server::actix_main,
    cli::{self, Arguments, Commands},
    config::NodeConfig,
};
use dotenv::dotenv;
use structopt::StructOpt;

#[actix_rt::main]
async fn main() -> anyhow::Result<()> {
    let args = Arguments::from_args();
    dotenv().ok();
    pretty_env_logger::init();

    let node_config = NodeConfig::load()?;

    match args.command.unwrap_or_default() {
        Commands::Start => actix_main(node_config).await?,
        Commands::Migrate => {
            println!("Migrating artifact store {}", node_config.gateway.storage_path.display());
            cli::migrate(node_config)?;
        },
        Commands::List(cmd) => cmd.run(node_config)?,
        Commands::Access(cmd) => cmd.run(node_config)?,
    };

    Ok(())
}
