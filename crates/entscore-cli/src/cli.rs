//! CLI definition and command dispatch for entscore.
//!
//! This module defines the command-line interface using `clap` and provides
//! the `run()` function that loads configuration and dispatches commands.
//!
//! ## Configuration Precedence
//!
//! Configuration is resolved with the following precedence (highest to lowest):
//! 1. CLI flags (e.g., `--index`, `--external-idf`, `--blend`)
//! 2. Environment variables (`ENTSCORE_CONFIG`, `ENTSCORE_INDEX`, ...)
//! 3. Config file (`~/.entscore/config.yaml` or path from `--config`)
//! 4. Built-in defaults

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::ui::{format, table, ColorMode, MessageType, Style};

use entscore_core::{
    compute_idf, rank_documents, CorpusStats, DbExternalIdf, DbFrequencyIndex, EntityIdfMode,
    GlobalConfig, IntoScoreResult, RankOptions, RankedDocument, Scorer, ScoreError,
};
use entscore_db::TableStats;

// ============================================================================
// CLI Definition
// ============================================================================

/// Entity-aware BM25+ relevance scoring
#[derive(Parser, Debug)]
#[command(name = "entscore")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, env = "ENTSCORE_VERBOSE")]
    pub verbose: bool,

    /// Suppress informational messages and hints
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file (default: ~/.entscore/config.yaml)
    #[arg(long, global = true, env = "ENTSCORE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Frequency table snapshot directory (default: ~/.entscore/index)
    #[arg(long, global = true, env = "ENTSCORE_INDEX")]
    pub index: Option<PathBuf>,

    /// General-language IDF table used to blend entity weights
    #[arg(long, global = true, env = "ENTSCORE_EXTERNAL_IDF")]
    pub external_idf: Option<PathBuf>,

    /// Color output mode: always, never, or auto (default: auto)
    #[arg(long, global = true, default_value = "auto")]
    pub color: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score one document against a query of terms and entities
    #[command(after_help = r#"EXAMPLES:
    # Score a document for two terms and one entity
    entscore score --doc pmc-0042 -t fever -t cough -e wuhan

    # Blend entity IDF with a general-language table
    entscore score --doc pmc-0042 -e wuhan --blend --external-idf en-idf.txt

    # JSON output for scripting
    entscore score --doc pmc-0042 -t fever --json
"#)]
    Score {
        /// Document id
        #[arg(long = "doc", value_name = "ID")]
        doc: String,

        /// Query term (repeatable)
        #[arg(short = 't', long = "term", value_name = "TERM")]
        terms: Vec<String>,

        /// Query entity (repeatable)
        #[arg(short = 'e', long = "entity", value_name = "ENTITY")]
        entities: Vec<String>,

        /// Blend entity IDF with the external table
        #[arg(long)]
        blend: bool,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Score a set of candidate documents and print them best first
    #[command(after_help = r#"EXAMPLES:
    # Rank three candidates
    entscore rank --doc a --doc b --doc c -t fever -e wuhan

    # Keep the best 5, ignore ids without a length record
    entscore rank --doc a --doc b --doc ghost -t fever --top-k 5 --skip-missing
"#)]
    Rank {
        /// Candidate document id (repeatable)
        #[arg(long = "doc", value_name = "ID", required = true)]
        docs: Vec<String>,

        /// Query term (repeatable)
        #[arg(short = 't', long = "term", value_name = "TERM")]
        terms: Vec<String>,

        /// Query entity (repeatable)
        #[arg(short = 'e', long = "entity", value_name = "ENTITY")]
        entities: Vec<String>,

        /// Number of results to keep (default: ranking.topK from config)
        #[arg(long)]
        top_k: Option<usize>,

        /// Skip candidates without a length record instead of failing
        #[arg(long)]
        skip_missing: bool,

        /// Score candidates on a single thread
        #[arg(long)]
        sequential: bool,

        /// Blend entity IDF with the external table
        #[arg(long)]
        blend: bool,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show statistics of the loaded frequency tables
    Stats {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Compute log10((N + 1) / df) for a document frequency
    Idf {
        /// Number of documents containing the token
        #[arg(long)]
        count: u64,

        /// Total number of documents in the corpus
        #[arg(long)]
        total: u64,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Convert a JSON dump of frequency tables into a snapshot
    #[command(after_help = r#"EXAMPLES:
    # Import into the default index directory
    entscore import dump.json

    # Import into a specific directory
    entscore import dump.json --out ./index
"#)]
    Import {
        /// JSON dump with documentLengths, termFrequencies, entityFrequencies,
        /// termIdf and entityIdf
        input: PathBuf,

        /// Snapshot directory (default: --index or index.path from config)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

// ============================================================================
// Entry point
// ============================================================================

/// Run the CLI and return the process exit code.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Warnings always reach stderr; debug output only with --verbose.
    let log_level = if cli.verbose { "debug" } else { "warn" };
    let filter = format!(
        "entscore_core={0},entscore_db={0},entscore_cli={0}",
        log_level
    );

    tracing_subscriber::fmt()
        .with_env_filter(&filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let color_mode = ColorMode::parse(&cli.color).unwrap_or_default();
    let style = Style::new(color_mode).quiet(cli.quiet);

    let config = match &cli.config {
        Some(path) => GlobalConfig::from_path(path),
        None => GlobalConfig::load_default(),
    };

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            let hint = match &cli.config {
                Some(path) => format!("Check your config at {}", path.display()),
                None => "Check your global config at ~/.entscore/config.yaml".to_string(),
            };
            eprintln!(
                "{}",
                style.error_with_context(
                    "Failed to load configuration",
                    Some(&e.to_string()),
                    Some(&hint),
                )
            );
            return ExitCode::FAILURE;
        }
    };

    let ctx = RunContext {
        style,
        config,
        index: cli.index,
        external_idf: cli.external_idf,
    };

    let result = match cli.command {
        Command::Score {
            doc,
            terms,
            entities,
            blend,
            json,
        } => handle_score(&ctx, &doc, &terms, &entities, blend, json),
        Command::Rank {
            docs,
            terms,
            entities,
            top_k,
            skip_missing,
            sequential,
            blend,
            json,
        } => {
            let mut options = RankOptions::from(&ctx.config.ranking);
            if top_k.is_some() {
                options.top_k = top_k;
            }
            options.skip_missing |= skip_missing;
            options.parallel &= !sequential;
            handle_rank(&ctx, &docs, &terms, &entities, &options, blend, json)
        }
        Command::Stats { json } => handle_stats(&ctx, json),
        Command::Idf { count, total, json } => handle_idf(&ctx, count, total, json),
        Command::Import { input, out } => handle_import(&ctx, &input, out),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", render_error(&ctx.style, &e));
            ExitCode::FAILURE
        }
    }
}

/// Everything a command handler needs besides its own arguments.
struct RunContext {
    style: Style,
    config: GlobalConfig,
    index: Option<PathBuf>,
    external_idf: Option<PathBuf>,
}

impl RunContext {
    fn index_dir(&self) -> anyhow::Result<PathBuf> {
        self.index
            .clone()
            .or_else(|| self.config.index.resolved_path())
            .ok_or_else(|| {
                ScoreError::invalid_configuration(
                    "no index directory",
                    "Pass --index or set index.path in the config file",
                )
                .into()
            })
    }

    fn open_index(&self) -> anyhow::Result<DbFrequencyIndex> {
        let dir = self.index_dir()?;
        let index = DbFrequencyIndex::open(&dir)?;
        tracing::debug!(
            "Loaded {} documents from {}",
            index.tables().num_documents(),
            dir.display()
        );
        Ok(index)
    }

    fn open_external_idf(&self) -> anyhow::Result<Option<DbExternalIdf>> {
        let path = self
            .external_idf
            .as_ref()
            .or(self.config.index.external_idf_path.as_ref());

        match path {
            Some(path) => {
                let table = DbExternalIdf::open(path, self.config.scoring.external_max_idf)
                    .with_context(|| format!("Failed to load external IDF table {}", path.display()))?;
                tracing::debug!("Loaded {} external IDF values", table.len());
                Ok(Some(table))
            }
            None => Ok(None),
        }
    }

    fn scorer<'a>(
        &self,
        index: &'a DbFrequencyIndex,
        external: Option<&'a DbExternalIdf>,
        blend: bool,
    ) -> Scorer<'a, DbFrequencyIndex> {
        let mut scorer = Scorer::from_config(index, &self.config.scoring);
        if blend {
            scorer = scorer.with_entity_idf_mode(EntityIdfMode::Blended);
        }
        match external {
            Some(table) => scorer = scorer.with_external_idf(table),
            None if scorer.entity_idf_mode() == EntityIdfMode::Blended => {
                self.style.notice(
                    MessageType::Warn,
                    "Blended entity IDF requested without an external IDF table; using corpus IDF",
                );
            }
            None => {}
        }
        scorer
    }
}

/// Format an error with its cause and, where one applies, a hint.
fn render_error(style: &Style, err: &anyhow::Error) -> String {
    let cause = err.chain().nth(1).map(|c| c.to_string());
    let hint = err.downcast_ref::<ScoreError>().and_then(|e| match e {
        ScoreError::DocumentNotFound { .. } => {
            Some("Check the document id, or use `entscore rank --skip-missing`")
        }
        ScoreError::IndexNotFound(_) => Some("Pass --index to use another snapshot directory"),
        ScoreError::IndexParse { .. } | ScoreError::InvalidIndexRow { .. } => {
            Some("Re-run `entscore import` to rebuild the snapshot")
        }
        _ => None,
    });

    style.error_with_context(&err.to_string(), cause.as_deref(), hint)
}

// ============================================================================
// Command handlers
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoreOutput<'a> {
    doc_id: &'a str,
    score: f64,
    terms: &'a [String],
    entities: &'a [String],
    entity_idf: EntityIdfMode,
    corpus: CorpusStats,
}

fn handle_score(
    ctx: &RunContext,
    doc: &str,
    terms: &[String],
    entities: &[String],
    blend: bool,
    json: bool,
) -> anyhow::Result<()> {
    let style = &ctx.style;
    let index = ctx.open_index()?;
    let external = ctx.open_external_idf()?;
    let stats = index.corpus_stats()?;
    let scorer = ctx.scorer(&index, external.as_ref(), blend);

    if terms.is_empty() && entities.is_empty() {
        style.notice(MessageType::Hint, "Empty query: pass --term or --entity");
    }

    let score = scorer.score(doc, terms, entities, &stats)?;

    if json {
        let output = ScoreOutput {
            doc_id: doc,
            score,
            terms,
            entities,
            entity_idf: scorer.entity_idf_mode(),
            corpus: stats,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", style.section("SCORE"));
    println!();
    println!("  {}", style.key_value("Document", doc));
    println!("  {}", style.key_value("Terms", &join_or_dash(terms)));
    println!("  {}", style.key_value("Entities", &join_or_dash(entities)));
    println!(
        "  {}",
        style.key_value("Entity IDF", &scorer.entity_idf_mode().to_string())
    );
    println!("  {}", style.key_value("Score", &style.score(score)));
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RankOutput<'a> {
    terms: &'a [String],
    entities: &'a [String],
    entity_idf: EntityIdfMode,
    results: &'a [RankedDocument],
    skipped: &'a [String],
}

fn handle_rank(
    ctx: &RunContext,
    docs: &[String],
    terms: &[String],
    entities: &[String],
    options: &RankOptions,
    blend: bool,
    json: bool,
) -> anyhow::Result<()> {
    let style = &ctx.style;
    let index = ctx.open_index()?;
    let external = ctx.open_external_idf()?;
    let stats = index.corpus_stats()?;
    let scorer = ctx.scorer(&index, external.as_ref(), blend);

    let ranking = rank_documents(&scorer, docs, terms, entities, &stats, options)?;

    if json {
        let output = RankOutput {
            terms,
            entities,
            entity_idf: scorer.entity_idf_mode(),
            results: &ranking.results,
            skipped: &ranking.skipped,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if ranking.results.is_empty() {
        println!("{}", style.message(MessageType::Info, "No documents ranked."));
    } else {
        println!("{}", table::render_ranking_table(&ranking.results));
    }

    for doc_id in &ranking.skipped {
        style.notice(
            MessageType::Skip,
            &format!("{} (no length record)", doc_id),
        );
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsOutput {
    index_path: PathBuf,
    built_at: Option<String>,
    stats: TableStats,
}

fn handle_stats(ctx: &RunContext, json: bool) -> anyhow::Result<()> {
    let style = &ctx.style;
    let dir = ctx.index_dir()?;
    let index = DbFrequencyIndex::open(&dir)?;
    let meta = entscore_db::load_meta(&dir).into_score_result()?;
    let stats = index.table_stats();
    let built_at = meta.map(|m| m.built_at.to_rfc3339());

    if json {
        let output = StatsOutput {
            index_path: dir,
            built_at,
            stats,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", style.section("CORPUS"));
    println!();
    println!(
        "  {}",
        style.key_value("Index", &style.file_path(&dir.display().to_string()))
    );
    if let Some(built_at) = &built_at {
        println!("  {}", style.key_value("Built", built_at));
    }
    println!();

    let metrics = [
        ("Documents", format::format_thousands(stats.num_documents as u64)),
        ("Terms", format::format_thousands(stats.term_vocabulary as u64)),
        ("Entities", format::format_thousands(stats.entity_vocabulary as u64)),
        ("Total tokens", format::format_thousands(stats.total_tokens)),
        ("Average length", format!("{:.2}", stats.avg_doc_length)),
        ("Max IDF", format!("{:.4}", stats.max_idf)),
    ];
    println!("{}", table::render_metrics_table(&metrics));

    if stats.num_documents == 0 {
        style.notice(MessageType::Warn, "The tables hold no documents; scoring will fail");
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IdfOutput {
    document_frequency: u64,
    total_documents: u64,
    idf: f64,
}

fn handle_idf(ctx: &RunContext, count: u64, total: u64, json: bool) -> anyhow::Result<()> {
    let idf = compute_idf(count, total)?;

    if json {
        let output = IdfOutput {
            document_frequency: count,
            total_documents: total,
            idf,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", ctx.style.key_value("IDF", &format!("{:.6}", idf)));
    }
    Ok(())
}

fn handle_import(ctx: &RunContext, input: &Path, out: Option<PathBuf>) -> anyhow::Result<()> {
    let style = &ctx.style;
    let dir = match out {
        Some(dir) => dir,
        None => ctx.index_dir()?,
    };

    let tables = entscore_db::import_json(input).into_score_result()?;

    if entscore_db::tables_exist(&dir) {
        style.notice(
            MessageType::Info,
            &format!("Replacing existing snapshot at {}", dir.display()),
        );
    }
    entscore_db::save_tables(&tables, &dir).into_score_result()?;

    let stats = tables.stats();
    println!(
        "{}",
        style.message(
            MessageType::Ok,
            &format!(
                "Imported {} documents into {}",
                format::format_thousands(stats.num_documents as u64),
                style.file_path(&dir.display().to_string())
            )
        )
    );
    style.notice(
        MessageType::Hint,
        &format!(
            "Score with: entscore --index {} score --doc <ID> -t <TERM>",
            dir.display()
        ),
    );
    Ok(())
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}
