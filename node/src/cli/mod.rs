use structopt::StructOpt;

mod access;
pub use access::AccessCommands;

mod list;
pub use list::{migrate, ListCommands};

#[derive(StructOpt, Default, Debug)]
/// REST gateway exposing smart contract ABIs as OpenAPI resources
pub struct Arguments {
    #[structopt(subcommand)]
    pub command: Option<Commands>,
}

#[derive(StructOpt, Debug)]
pub enum Commands {
    /// Start the gateway
    Start,
    /// Migrate legacy contract descriptors in the artifact store
    Migrate,
    /// Print the sorted local registry index
    List(ListCommands),
    /// Event stream API access management
    Access(AccessCommands),
}
impl Default for Commands {
    fn default() -> Self {
        Commands::Start
    }
}
