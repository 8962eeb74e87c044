use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use route_table::{routing::view::parse_method, Error, NamedRouteTable, RouteManifest};
use structopt::StructOpt;
use tracing::info;

#[derive(Debug, StructOpt)]
#[structopt(name = "route-table", about = "Inspect route manifests")]
struct Opt {
    /// Route manifest to load
    #[structopt(short, long, env = "ROUTES_FILE", parse(from_os_str))]
    config: PathBuf,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Lists routes in traversal order
    List,
    /// Resolves a request to its endpoint
    Resolve { method: String, path: String },
    /// Builds the path of a named route from key=value parameters
    UrlFor { name: String, params: Vec<String> },
    /// Merges another manifest on top of the loaded one and lists the result
    Merge {
        #[structopt(parse(from_os_str))]
        other: PathBuf,
    },
}

fn load(path: &Path) -> Result<NamedRouteTable<String>> {
    let table = RouteManifest::from_path(path)
        .and_then(RouteManifest::into_table)
        .with_context(|| format!("loading {}", path.display()))?;
    info!("Loaded {} routes from {}", table.len(), path.display());
    Ok(table)
}

fn list(table: &NamedRouteTable<String>) {
    for route in table {
        let methods = route
            .payload
            .bindings()
            .map(|binding| format!("{}={}", binding.method(), binding.handler()))
            .collect::<Vec<_>>()
            .join(" ");
        match route.payload.name() {
            Some(name) => println!("{} [{}] {}", route.path, name, methods),
            None => println!("{} {}", route.path, methods),
        }
    }
}

fn main() -> Result<()> {
    route_table::logging::install();
    let opt = Opt::from_args();
    let table = load(&opt.config)?;

    match opt.command {
        Command::List => list(&table),
        Command::Resolve { method, path } => {
            let method = parse_method(&method).map_err(Error::from)?;
            match table.resolve(&method, &path) {
                Ok(Some(route)) => {
                    println!("{} -> {}", route.pattern, route.handler());
                    for (key, value) in &route.params {
                        println!("  {key} = {value}");
                    }
                }
                Ok(None) => return Err(anyhow!("404 Not Found: {path}")),
                Err(err) => {
                    let allowed = err
                        .allowed_methods()
                        .unwrap_or_default()
                        .iter()
                        .map(|method| method.as_str())
                        .collect::<Vec<_>>()
                        .join(", ");
                    return Err(anyhow!("{err} (allowed: {allowed})"));
                }
            }
        }
        Command::UrlFor { name, params } => {
            let params = params
                .iter()
                .map(|param| {
                    param
                        .split_once('=')
                        .ok_or_else(|| anyhow!("expected key=value, got '{param}'"))
                })
                .collect::<Result<Vec<_>>>()?;
            println!("{}", table.url_for(&name, &params)?);
        }
        Command::Merge { other } => {
            let merged = table.merge(&load(&other)?)?;
            list(&merged);
        }
    }
    Ok(())
}
