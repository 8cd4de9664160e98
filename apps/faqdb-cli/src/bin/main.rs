use std::env;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use faqdb_core::catalog::{load_panoramas, load_projects};
use faqdb_core::config::{expand_path, Config, DataConfig};
use faqdb_core::error::Error;
use faqdb_core::snapshot::{read_raw_faq, read_snapshot, write_snapshot};
use faqdb_core::types::NamedTarget;
use faqdb_embed::default_capabilities;
use faqdb_hybrid::{CorpusHandle, FaqEngine, Response};
use faqdb_text::route;
use faqdb_vector::{build_snapshot, BuildOptions};

const USAGE: &str = "Usage: faqdb <build [raw.json] [out.json] | ask \"<question>\" | route \"<query>\" | chat>";

/// Follow-ups this short are read as a continuation of the previous question.
const FOLLOW_UP_MAX_CHARS: usize = 4;

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("{USAGE}");
        std::process::exit(1);
    }
    let cmd = args.remove(0);
    (cmd, args)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {e}");
        e
    })?;
    let (cmd, args) = parse_args();
    match cmd.as_str() {
        "build" => build(&config, &args).await,
        "ask" => {
            let question = args.join(" ");
            if question.trim().is_empty() {
                eprintln!("Usage: faqdb ask \"<question>\"");
                std::process::exit(1);
            }
            let session = Session::open(&config)?;
            let response = session.respond(&question).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        "route" => {
            let session = Session::open(&config)?;
            let query = args.join(" ");
            match route_only(&session, &query) {
                Some(response) => println!("{}", serde_json::to_string_pretty(&response)?),
                None => println!("no navigation target"),
            }
            Ok(())
        }
        "chat" => chat(&config).await,
        _ => {
            eprintln!("Unknown command: {cmd}\n{USAGE}");
            std::process::exit(1);
        }
    }
}

async fn build(config: &Config, args: &[String]) -> anyhow::Result<()> {
    let data = config.data()?;
    let raw_path = args.first().map_or_else(|| expand_path(&data.raw_faq_path), PathBuf::from);
    let out_path = args.get(1).map_or_else(|| expand_path(&data.snapshot_path), PathBuf::from);

    let raw = read_raw_faq(&raw_path).with_context(|| format!("reading {}", raw_path.display()))?;
    let previous = match read_snapshot(&out_path) {
        Ok(entries) => entries,
        Err(Error::NotFound(_)) => Vec::new(),
        Err(e) => {
            warn!(error = %e, "previous snapshot unreadable; embedding everything");
            Vec::new()
        }
    };

    let capabilities = default_capabilities(config.gemini()?);
    info!(
        raw = %raw_path.display(),
        out = %out_path.display(),
        embedder = capabilities.embedder.embedder_id(),
        "building snapshot"
    );
    let (entries, report) =
        build_snapshot(&raw, capabilities.embedder.as_ref(), &previous, &BuildOptions::default()).await?;
    write_snapshot(&out_path, &entries)?;
    println!(
        "Wrote {} entries to {} ({} reused, {} embedded, {} without vector)",
        report.total,
        out_path.display(),
        report.reused,
        report.embedded,
        report.failed
    );
    Ok(())
}

/// One loaded corpus plus navigation catalogs and the engine over them.
struct Session {
    engine: FaqEngine,
    panoramas: Vec<NamedTarget>,
    projects: Vec<NamedTarget>,
    max_edit_distance: usize,
}

impl Session {
    fn open(config: &Config) -> anyhow::Result<Self> {
        let data = config.data()?;
        let corpus = Arc::new(CorpusHandle::new());
        let snapshot_path = expand_path(&data.snapshot_path);
        if let Err(e) = corpus.load_once(&snapshot_path) {
            warn!(path = %snapshot_path.display(), error = %e, "no corpus loaded; every question will fall back");
        }

        let capabilities = default_capabilities(config.gemini()?);
        let router = config.router()?;
        let max_edit_distance = router.max_edit_distance;
        let engine = FaqEngine::new(corpus, capabilities.embedder, capabilities.validator)
            .with_retrieval(config.retrieval()?)
            .with_router(router)
            .with_capabilities(config.capabilities()?);
        let (panoramas, projects) = load_catalogs(&data);
        Ok(Self { engine, panoramas, projects, max_edit_distance })
    }

    async fn respond(&self, question: &str) -> Response {
        self.engine.respond(question, &self.panoramas, &self.projects).await
    }
}

/// Navigation resolution alone, without falling through to the FAQ.
fn route_only(session: &Session, query: &str) -> Option<Response> {
    route(query, &session.panoramas, &session.projects, session.max_edit_distance)
        .map(|hit| Response::Navigate { kind: hit.kind, target: hit.target.clone() })
}

fn load_catalogs(data: &DataConfig) -> (Vec<NamedTarget>, Vec<NamedTarget>) {
    fn load(path: Option<&str>, loader: fn(&Path) -> faqdb_core::error::Result<Vec<NamedTarget>>) -> Vec<NamedTarget> {
        let Some(path) = path.map(expand_path) else {
            return Vec::new();
        };
        loader(&path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "catalog not loaded");
            Vec::new()
        })
    }
    (load(data.panoramas_path.as_deref(), load_panoramas), load(data.projects_path.as_deref(), load_projects))
}

/// Expand a terse follow-up ("and?", "fees") with the previous question.
fn contextualize(input: &str, previous: Option<&str>) -> String {
    let input = input.trim();
    match previous {
        Some(prev) if input.chars().count() <= FOLLOW_UP_MAX_CHARS => format!("{prev} {input}"),
        _ => input.to_string(),
    }
}

/// Single-slot memory of the last line the user typed, as typed.
#[derive(Debug, Default)]
struct ChatMemory {
    last: Option<String>,
}

impl ChatMemory {
    /// Question to ask for `line`; remembers the raw line, not the expansion.
    fn next_question(&mut self, line: &str) -> String {
        let question = contextualize(line, self.last.as_deref());
        self.last = Some(line.trim().to_string());
        question
    }
}

async fn chat(config: &Config) -> anyhow::Result<()> {
    let session = Session::open(config)?;
    println!("Ask a question (empty line or Ctrl-D to quit).");
    let stdin = io::stdin();
    let mut memory = ChatMemory::default();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 || line.trim().is_empty() {
            break;
        }
        let question = memory.next_question(&line);
        match session.respond(&question).await {
            Response::Navigate { kind, target } => {
                println!("[{kind:?}] {}", target.label);
                if let Some(url) = target.url {
                    println!("{url}");
                }
            }
            Response::Answer(answer) => println!("{}", answer.text),
        }
    }
    Ok(())
}
