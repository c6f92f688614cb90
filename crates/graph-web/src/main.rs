use std::path::PathBuf;
use std::sync::Arc;

use facet::Facet;
use figue as args;
use graph_sqlite::SqliteGraphRepository;
use graph_types::{GraphId, Value};
use graph_web::api::build_router;
use graph_web::app::AppState;
use graph_wire::{GetGraphRequest, ProcessGraphResponse, RunConfigRequest};
use tokio::net::TcpListener;
use tracing::info;

const DEFAULT_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_DB: &str = "graph-engine.sqlite";
const DEFAULT_CLIENT_URL: &str = "http://127.0.0.1:8080";

#[derive(Facet, Debug)]
struct ServerCli {
    #[facet(flatten)]
    builtins: args::FigueBuiltins,
    #[facet(args::named, default)]
    addr: Option<String>,
    #[facet(args::named, default)]
    db: Option<String>,
}

#[derive(Facet, Debug)]
struct ClientCli {
    #[facet(flatten)]
    builtins: args::FigueBuiltins,
    #[facet(args::subcommand)]
    command: ClientCommand,
}

#[derive(Facet, Debug)]
#[repr(u8)]
enum ClientCommand {
    Run {
        #[facet(args::named, default)]
        url: Option<String>,
        #[facet(args::named)]
        graph_id: String,
        /// JSON-encoded `{node_id: {key: value}}` seed map, e.g.
        /// `'{"a":{"x":1}}'`.
        #[facet(args::named, default)]
        root_inputs: Option<String>,
    },
    GetGraph {
        #[facet(args::named, default)]
        url: Option<String>,
        #[facet(args::named)]
        graph_id: String,
    },
}

fn main() {
    let cli_args: Vec<String> = std::env::args().skip(1).collect();
    if cli_args.first().map(String::as_str).is_some_and(is_client_command) {
        if let Err(error) = run_client() {
            eprintln!("{error}");
            std::process::exit(1);
        }
        return;
    }

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
        .block_on(async {
            if let Err(error) = run_server().await {
                eprintln!("{error}");
                std::process::exit(1);
            }
        });
}

fn is_client_command(value: &str) -> bool {
    matches!(value, "run" | "get-graph")
}

async fn run_server() -> Result<(), String> {
    let cli = parse_server_cli()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let addr = cli
        .addr
        .or_else(|| std::env::var("GRAPH_ENGINE_ADDR").ok())
        .unwrap_or_else(|| DEFAULT_ADDR.to_string());
    let db_path = cli
        .db
        .or_else(|| std::env::var("GRAPH_ENGINE_DB").ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB));

    let repo = SqliteGraphRepository::open(db_path.clone())
        .map_err(|error| format!("failed to open sqlite at {}: {error}", db_path.display()))?;
    let state = AppState::new(Arc::new(repo));

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|error| format!("failed to bind HTTP on {addr}: {error}"))?;
    info!(%addr, db = %db_path.display(), "graph-web HTTP API ready");

    let app = build_router(state);
    axum::serve(listener, app)
        .await
        .map_err(|error| format!("HTTP server error: {error}"))
}

fn run_client() -> Result<(), String> {
    let cli = parse_client_cli()?;
    match cli.command {
        ClientCommand::Run { url, graph_id, root_inputs } => run_process_graph(url, graph_id, root_inputs),
        ClientCommand::GetGraph { url, graph_id } => run_get_graph(url, graph_id),
    }
}

fn run_process_graph(url: Option<String>, graph_id: String, root_inputs: Option<String>) -> Result<(), String> {
    let base_url = url.unwrap_or_else(|| DEFAULT_CLIENT_URL.to_string());

    let root_inputs: std::collections::BTreeMap<String, std::collections::BTreeMap<String, Value>> = match root_inputs
    {
        Some(json) => facet_json::from_str(&json).map_err(|error| format!("invalid --root-inputs json: {error}"))?,
        None => Default::default(),
    };

    let request = RunConfigRequest {
        graph_id: GraphId::new(graph_id),
        root_inputs,
        disable_list: Default::default(),
        data_overwrites: Default::default(),
    };
    let body = facet_json::to_string(&request).map_err(|error| format!("encode run config: {error}"))?;

    let url = format!("{}/graph/process_graph", base_url.trim_end_matches('/'));
    let response_body = http_post_json(&url, &body)?;

    // The response is either a sentinel `{"Result": "..."}` message or a
    // per-node state map; try the map shape first since it's the common
    // case, falling back to printing the raw body otherwise.
    match facet_json::from_str::<ProcessGraphResponse>(&response_body) {
        Ok(state) => {
            let pretty = facet_json::to_string_pretty(&state).map_err(|error| format!("pretty-print result: {error}"))?;
            println!("{pretty}");
        }
        Err(_) => println!("{response_body}"),
    }
    Ok(())
}

fn run_get_graph(url: Option<String>, graph_id: String) -> Result<(), String> {
    let base_url = url.unwrap_or_else(|| DEFAULT_CLIENT_URL.to_string());

    let request = GetGraphRequest { graph_id: GraphId::new(graph_id) };
    let body = facet_json::to_string(&request).map_err(|error| format!("encode get_graph request: {error}"))?;

    let url = format!("{}/crud/get_graph", base_url.trim_end_matches('/'));
    let response_body = http_post_json(&url, &body)?;

    let parsed: graph_wire::GetGraphResponse =
        facet_json::from_str(&response_body).map_err(|error| format!("decode get_graph response: {error}"))?;
    let pretty = facet_json::to_string_pretty(&parsed).map_err(|error| format!("pretty-print result: {error}"))?;
    println!("{pretty}");
    Ok(())
}

fn parse_server_cli() -> Result<ServerCli, String> {
    let figue_config = args::builder::<ServerCli>()
        .map_err(|error| format!("failed to build CLI schema: {error}"))?
        .cli(|cli| cli.strict())
        .help(|h| {
            h.program_name("graph-web")
                .description("HTTP server for the typed dataflow graph execution engine")
                .version(option_env!("CARGO_PKG_VERSION").unwrap_or("dev"))
        })
        .build();
    args::Driver::new(figue_config)
        .run()
        .into_result()
        .map(|cli| cli.value)
        .map_err(|error| error.to_string())
}

fn parse_client_cli() -> Result<ClientCli, String> {
    let figue_config = args::builder::<ClientCli>()
        .map_err(|error| format!("failed to build CLI schema: {error}"))?
        .cli(|cli| cli.strict())
        .help(|h| {
            h.program_name("graph-web")
                .description("CLI client for graph-web's run-config and graph-inspection endpoints")
                .version(option_env!("CARGO_PKG_VERSION").unwrap_or("dev"))
        })
        .build();
    args::Driver::new(figue_config)
        .run()
        .into_result()
        .map(|cli| cli.value)
        .map_err(|error| error.to_string())
}

fn http_post_json(url: &str, body: &str) -> Result<String, String> {
    let response = ureq::post(url)
        .set("content-type", "application/json")
        .send_string(body)
        .map_err(|error| format!("POST {url}: {error}"))?;
    response
        .into_string()
        .map_err(|error| format!("read POST response body: {error}"))
}
