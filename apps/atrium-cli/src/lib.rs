use std::{path::PathBuf, sync::Arc};

use atrium_domain::{KeywordTableClassifier, TableClassifier};
use atrium_retrieval::{RetrievalResult, RetrievalService, RetrieveRequest};
use atrium_storage::db::Db;
use clap::{
	Parser, Subcommand,
	builder::{
		Styles,
		styling::{AnsiColor, Effects},
	},
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
	version,
	rename_all = "kebab",
	styles = styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE", global = true, default_value = "atrium.toml")]
	pub config: PathBuf,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Apply the database schema, creating missing tables and extensions.
	Schema,
	/// Run retrieval and print the evidence set.
	Retrieve {
		query: String,
		#[arg(long, short = 'k')]
		k: Option<u32>,
		#[arg(long)]
		overfetch: Option<u32>,
		#[arg(long)]
		project_id: Option<i64>,
		#[arg(long)]
		project_name: Option<String>,
		/// Skip the curated-facts path.
		#[arg(long)]
		no_facts: bool,
		/// Attach the orchestrator's decision trace to the output.
		#[arg(long)]
		debug: bool,
		#[arg(long)]
		json: bool,
	},
	/// Retrieve evidence and generate a grounded answer.
	Ask {
		query: String,
		#[arg(long, short = 'k')]
		k: Option<u32>,
		#[arg(long)]
		project_id: Option<i64>,
		#[arg(long)]
		project_name: Option<String>,
	},
	/// Label a table snippet with the keyword classifier.
	ClassifyTable {
		/// File holding the table text; the first line is taken as the header row.
		file: PathBuf,
	},
}

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Red.on_default() | Effects::BOLD)
		.usage(AnsiColor::Red.on_default() | Effects::BOLD)
		.literal(AnsiColor::Blue.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Green.on_default())
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let cfg = atrium_config::load(&args.config)?;

	init_tracing(&cfg);

	match args.command {
		Command::Schema => {
			let db = Db::connect(&cfg.storage.postgres).await?;

			db.ensure_schema(cfg.storage.postgres.vector_dim).await?;
			println!("schema applied");
		},
		Command::Retrieve {
			query,
			k,
			overfetch,
			project_id,
			project_name,
			no_facts,
			debug,
			json,
		} => {
			let db = Db::connect(&cfg.storage.postgres).await?;
			let service = RetrievalService::new(cfg, Arc::new(db));
			let req = RetrieveRequest {
				query,
				k,
				overfetch,
				project_id,
				project_name,
				include_facts: !no_facts,
				debug,
			};
			let result = service.retrieve(&req).await?;

			if json {
				println!("{}", serde_json::to_string_pretty(&result)?);
			} else {
				print_result(&result);
			}
		},
		Command::Ask { query, k, project_id, project_name } => {
			let db = Db::connect(&cfg.storage.postgres).await?;
			let service = RetrievalService::new(cfg, Arc::new(db));
			let req = RetrieveRequest {
				query,
				k,
				overfetch: None,
				project_id,
				project_name,
				include_facts: true,
				debug: false,
			};

			println!("{}", service.ask(&req).await?);
		},
		Command::ClassifyTable { file } => {
			let text = std::fs::read_to_string(&file)?;
			let header = text.lines().next();
			let kind = KeywordTableClassifier.classify(&text, header);

			println!("{}", kind.as_str());
		},
	}

	Ok(())
}

fn print_result(result: &RetrievalResult) {
	println!("mode: {}", result.mode.as_str());

	if let Some(trace) = &result.trace {
		println!(
			"intent: {} | terms: {} | expansions: {} | project: {}",
			trace.intent.as_str(),
			trace.keyword_terms.join(", "),
			trace.expanded_queries.join(" / "),
			trace.project_filter.as_deref().unwrap_or("-"),
		);
	}
	for (index, ((answer, meta), score)) in
		result.answers.iter().zip(&result.metas).zip(&result.scores).enumerate()
	{
		let source = meta.source.as_deref().unwrap_or("unknown");
		let page = meta.page.map(|page| format!(" p.{page}")).unwrap_or_default();

		println!("\n{}) [{score:.3}] {source}{page}", index + 1);
		println!("{answer}");
	}
}

fn init_tracing(cfg: &atrium_config::Config) {
	let filter =
		EnvFilter::try_new(&cfg.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();
}
