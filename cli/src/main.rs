use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};
use vsm_core::{Boosts, EngineConfig, IdfVariant, RankedResult, SearchEngine};

#[derive(Parser)]
#[command(name = "vsm")]
#[command(about = "Rank a tagged document collection against queries with TF-IDF cosine similarity", long_about = None)]
struct Cli {
    /// Collection file (.I/.T/.A/.B/.W records)
    #[arg(long, global = true, default_value = "cran.all.1400")]
    collection: String,
    /// JSON engine configuration file, e.g. containing {"idf":"smoothed"}
    #[arg(long, global = true)]
    config: Option<String>,
    /// Use smoothed IDF = ln(1 + N/df) instead of ln(N/df)
    #[arg(long, global = true, default_value_t = false)]
    smoothed_idf: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Ranking {
    /// Weight of the title similarity
    #[arg(long, default_value_t = 0.5)]
    boost_title: f64,
    /// Weight of the abstract similarity
    #[arg(long, default_value_t = 0.5)]
    boost_abstract: f64,
    /// Number of results to show
    #[arg(short, long, default_value_t = 10)]
    k: usize,
    /// Print results as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Index the collection and print its statistics
    Stats,
    /// Rank documents against free text
    Search {
        text: String,
        #[command(flatten)]
        ranking: Ranking,
    },
    /// Rank documents against a query from the query file
    Query {
        /// Query id, e.g. 001
        id: String,
        /// Query file (.I/.W records)
        #[arg(long, default_value = "cran.qry")]
        queries: String,
        #[command(flatten)]
        ranking: Ranking,
    },
    /// Print the title of a document
    Title { doc_id: u32 },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    if cli.smoothed_idf {
        config.idf = IdfVariant::Smoothed;
    }

    let mut engine = SearchEngine::with_config(config);
    let stats = engine.build_index(&cli.collection)?;
    tracing::info!(
        collection = %cli.collection,
        documents = stats.documents,
        malformed = stats.malformed_records,
        "collection ready"
    );

    match cli.command {
        Commands::Stats => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Commands::Search { text, ranking } => {
            let boosts = Boosts::new(ranking.boost_title, ranking.boost_abstract)?;
            let hits = engine.search(&text, boosts).len();
            tracing::info!(hits, k = ranking.k, "search complete");
            print_results(&engine, &ranking)?;
        }
        Commands::Query { id, queries, ranking } => {
            let boosts = Boosts::new(ranking.boost_title, ranking.boost_abstract)?;
            let loaded = engine.build_queries(&queries)?;
            tracing::info!(queries = loaded, path = %queries, "query file ready");
            let text = engine.query_or_err(&id)?.to_string();
            println!("query {id}: {text}\n");
            let hits = engine.search(&text, boosts).len();
            tracing::info!(query = %id, hits, k = ranking.k, "search complete");
            print_results(&engine, &ranking)?;
        }
        Commands::Title { doc_id } => match engine.get_title(doc_id) {
            Some(title) => println!("{title}"),
            None => bail!("no document with id {doc_id}"),
        },
    }
    Ok(())
}

fn print_results(engine: &SearchEngine, ranking: &Ranking) -> Result<()> {
    let top: &[RankedResult] = engine.top_k(ranking.k);
    if ranking.json {
        println!("{}", serde_json::to_string_pretty(top)?);
        return Ok(());
    }
    if top.is_empty() {
        println!("no matching documents");
        return Ok(());
    }
    println!("{:>5} {:>7} {:>12}  title", "rank", "doc", "score");
    for (rank, hit) in top.iter().enumerate() {
        let title = engine.get_title(hit.document_id).unwrap_or("");
        println!("{:>5} {:>7} {:>12.6}  {}", rank + 1, hit.document_id, hit.score, title);
    }
    Ok(())
}
