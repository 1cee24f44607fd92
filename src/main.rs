use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use calldata_lens::config::{self, Config};
use calldata_lens::core::{parse_command, Command};
use calldata_lens::domain::example::{builtin_examples, find_example};
use calldata_lens::{
    AlloyCalldataDecoder, DecodeBridge, ProcessedParam, Session, SessionStore, ShareLink,
};

type Store = SessionStore<AlloyCalldataDecoder, ShareLink>;

#[derive(Debug, Parser)]
#[command(
    name = "calldata-lens",
    version,
    about = "Decode ABI calldata against a function signature"
)]
struct Args {
    /// Function signature (e.g. "transfer(address,uint256)")
    #[arg(long, short)]
    signature: Option<String>,

    /// Hex calldata including the 4-byte selector
    #[arg(long, short)]
    calldata: Option<String>,

    /// Open a share link produced by a previous session
    #[arg(long, conflicts_with_all = ["signature", "calldata", "example", "resume"])]
    url: Option<String>,

    /// Load a built-in or configured example by name
    #[arg(long, short, conflicts_with_all = ["signature", "calldata", "resume"])]
    example: Option<String>,

    /// Reopen the last decoded session
    #[arg(long, conflicts_with_all = ["signature", "calldata"])]
    resume: bool,

    /// List available examples and exit
    #[arg(long)]
    list_examples: bool,

    /// Print the session as JSON
    #[arg(long)]
    json: bool,

    /// Read : commands from stdin after loading
    #[arg(long, short)]
    interactive: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let config = config::load();
    init_tracing(&config);

    if args.list_examples {
        for example in config.examples.iter().cloned().chain(builtin_examples()) {
            println!("{:<32} {}", example.name, example.signature);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let persist_path = config::last_session_path();
    let link = initial_link(&args, &config, persist_path.as_ref())?;
    let mut store = SessionStore::new(AlloyCalldataDecoder::new(), link);

    if args.url.is_some() || args.resume {
        if !store.load_from_url() {
            bail!("link has no signature/calldata to decode");
        }
    } else if let Some(name) = &args.example {
        let example = find_example(name, &config.examples)
            .with_context(|| format!("unknown example '{}' (see --list-examples)", name))?;
        store.load_example(&example);
    } else {
        match (&args.signature, &args.calldata) {
            (Some(signature), Some(calldata)) => {
                store.set_signature(signature.as_str());
                store.set_calldata(calldata.as_str());
                store.decode();
            }
            (None, None) => {}
            _ => bail!("--signature and --calldata must be given together"),
        }
    }

    if args.interactive {
        run_interactive(&mut store, &config, persist_path)?;
        return Ok(ExitCode::SUCCESS);
    }

    print_session(&store, args.json)?;
    if store.session().last_error().is_some() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn init_tracing(config: &Config) {
    let fallback = config.log_filter.as_deref().unwrap_or("warn");
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn initial_link(args: &Args, config: &Config, persist_path: Option<&PathBuf>) -> Result<ShareLink> {
    let link = if let Some(url) = &args.url {
        ShareLink::parse(url)?
    } else if args.resume {
        let path = persist_path.context("no data directory for session history")?;
        ShareLink::load(path).context("no previous session to resume")?
    } else {
        ShareLink::parse(&config.share_base_url).or_else(|err| {
            tracing::warn!(error = %format!("{err:#}"), "falling back to default share base url");
            ShareLink::parse(config::DEFAULT_SHARE_BASE_URL)
        })?
    };

    Ok(match persist_path {
        Some(path) => link.with_persist_path(path),
        None => link,
    })
}

fn print_session(store: &Store, json: bool) -> Result<()> {
    let session = store.session();
    if json {
        let output = serde_json::json!({
            "session": session,
            "phase": session.phase(),
            "share_link": store.url_sync().as_str(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print!("{}", render_session(session));
    if !session.signature().is_empty() {
        println!("share: {}", store.url_sync().as_str());
    }
    Ok(())
}

fn render_session(session: &Session) -> String {
    let mut out = String::new();
    if let Some(error) = session.last_error() {
        out.push_str(error);
        out.push('\n');
        return out;
    }
    let Some(decoded) = session.decoded() else {
        if !session.signature().is_empty() {
            out.push_str(&format!("signature: {}\n", session.signature()));
        }
        if !session.calldata().is_empty() {
            out.push_str(&format!("calldata:  {}\n", session.calldata()));
        }
        return out;
    };

    out.push_str(&format!("{}  [{}]\n", decoded.signature, decoded.selector));
    for param in &decoded.top_level_params {
        render_param(session, param, 1, &mut out);
    }
    out
}

fn render_param(session: &Session, param: &ProcessedParam, depth: usize, out: &mut String) {
    let mark = if session.is_selected(param.id) { "x" } else { " " };
    let hover = if session.hovered() == Some(param.id) { ">" } else { " " };
    let detail = if param.is_leaf() {
        format!("= {}", param.value)
    } else {
        format!("({} components)", param.components.len())
    };
    out.push_str(&format!(
        "{}[{}]{}#{} {}: {} {}\n",
        "  ".repeat(depth),
        mark,
        hover,
        param.id,
        param.name,
        param.kind,
        detail
    ));
    for component in &param.components {
        render_param(session, component, depth + 1, out);
    }
}

const HELP: &str = "\
commands:
  sig <signature>    set the function signature
  data <calldata>    set the calldata
  decode             decode the current inputs
  toggle <id>        toggle selection of a parameter
  hover [id]         set or clear the hovered parameter
  all | none         select / deselect every parameter
  clear              drop the decoded result
  reset              clear inputs and result
  example [name]     load an example (lists examples without a name)
  url <link>         open a share link
  show | share       print the session / the share link
  quit";

fn run_interactive(store: &mut Store, config: &Config, persist_path: Option<PathBuf>) -> Result<()> {
    let bridge = DecodeBridge::new(AlloyCalldataDecoder::new())?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    print!("{}", render_session(store.session()));
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Command::Decode => {
                bridge.submit(store)?;
                bridge.wait(store)?;
                print!("{}", render_session(store.session()));
            }
            Command::Example(None) => {
                for example in config.examples.iter().cloned().chain(builtin_examples()) {
                    println!("{:<32} {}", example.name, example.signature);
                }
            }
            Command::Example(Some(name)) => match find_example(&name, &config.examples) {
                Some(example) => {
                    store.load_example(&example);
                    print!("{}", render_session(store.session()));
                }
                None => println!("unknown example: {}", name),
            },
            Command::Url(link) => match ShareLink::parse(&link) {
                Ok(link) => {
                    *store.url_sync_mut() = match &persist_path {
                        Some(path) => link.with_persist_path(path),
                        None => link,
                    };
                    if store.load_from_url() {
                        print!("{}", render_session(store.session()));
                    } else {
                        println!("link has no signature/calldata to decode");
                    }
                }
                Err(err) => println!("{:#}", err),
            },
            Command::Show => print!("{}", render_session(store.session())),
            Command::Share => println!("{}", store.url_sync().as_str()),
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
            Command::Unknown(input) => println!("Unknown command: {} (try 'help')", input),
            command => {
                if let Some(action) = command.into_action() {
                    store.dispatch(action);
                }
            }
        }
    }
    Ok(())
}
