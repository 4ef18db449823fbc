use clap::{Parser, Subcommand};
use dialog_matcher::behavior::{evaluate_all, ConditionLoader};
use dialog_matcher::expressions::{ExpressionProvider, TextExpressionProvider};
use dialog_matcher::memory::{
    ConversationMemory, ConversationMemoryStore, FileConversationMemoryStore,
};
use dotenv::dotenv;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate conditions against a stored conversation
    Check {
        /// Path to the YAML condition file
        #[arg(short, long)]
        conditions: String,

        /// Directory holding conversation snapshots
        #[arg(short, long, default_value = "conversations")]
        store: String,

        /// Conversation id to evaluate
        #[arg(short = 'i', long)]
        conversation: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Decode an expression list and print it in canonical form
    Parse {
        /// The expression string to decode
        #[arg(short, long)]
        input: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Check {
            conditions,
            store,
            conversation,
            json,
        } => {
            let loader = ConditionLoader::default();
            let conditions = loader.load_file(&conditions)?;
            log::info!("Loaded {} condition(s)", conditions.len());

            let store = FileConversationMemoryStore::new(&store);
            let snapshot = store.load_snapshot(&conversation).await?;
            log::info!(
                "Loaded conversation {} ({:?}, {} step(s))",
                snapshot.conversation_id,
                snapshot.conversation_state,
                snapshot.steps.len()
            );
            let memory = ConversationMemory::from_snapshot(snapshot);

            let report = evaluate_all(&conditions, &memory);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for outcome in &report.outcomes {
                    match &outcome.error {
                        Some(error) => println!("{}: {} ({})", outcome.name, outcome.state, error),
                        None => println!("{}: {}", outcome.name, outcome.state),
                    }
                }
            }

            if report.has_errors() {
                anyhow::bail!("one or more conditions could not be evaluated");
            }
        }
        Commands::Parse { input } => {
            let expressions = TextExpressionProvider::new().parse_expressions(&input)?;
            for expression in expressions {
                println!("{}", expression);
            }
        }
    }

    Ok(())
}
