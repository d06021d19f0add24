// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dualtree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dualtree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Dualtree CLI entrypoint.
//!
//! Opens the single-trace viewer against the visualisation server, or the merged viewer when a
//! second trace and its diff points are given.

use std::error::Error;
use std::path::{Path, PathBuf};

use dualtree::config::{
    load_diff_points, parse_id_list, ViewConfig, DEFAULT_HOST, DEFAULT_LOAD_DEPTH, DEFAULT_PORT,
};
use dualtree::container::TreeContainer;
use dualtree::forest::MergedView;
use dualtree::loader::{demo_trace, HttpNodeSource, MemoryNodeSource, NodeSource, DEMO_PATH};
use dualtree::model::{NodeId, TraceCore};
use dualtree::nav::NavContext;
use dualtree::tui::{self, MergedScreen, TreeScreen};
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

const DEMO_DEPTH: u32 = 6;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} --path <trace> [--host <host>] [--port <port>] [--load-depth <n>] [--solution <ids>] [--playing] [--collapse-as-exploring] [--log-file <file>]\n  {program} --path <trace> --right <trace> --diff-points <file> [--host <host>] [--port <port>] [--load-depth <n>] [--log-file <file>]\n  {program} --demo [--playing] [--collapse-as-exploring] [--log-file <file>]\n\nNodes are loaded from `http://<host>:<port>` (default {DEFAULT_HOST}:{DEFAULT_PORT}), {DEFAULT_LOAD_DEPTH} levels per request unless --load-depth says otherwise.\n--solution takes the comma-separated root-to-solution ids, e.g. `0,3,7`.\n--right with --diff-points (a JSON array of diff points) opens the merged view of both traces.\n--demo browses a built-in trace without a server.\n\n--log-file writes tracing output to <file>; RUST_LOG selects the level (default info)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    demo: bool,
    path: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    load_depth: Option<u32>,
    solution: Option<Vec<NodeId>>,
    playing: bool,
    collapse_as_exploring: bool,
    log_file: Option<PathBuf>,
    right: Option<String>,
    diff_points: Option<PathBuf>,
}

impl CliOptions {
    fn into_config(self) -> ViewConfig {
        let path = if self.demo { DEMO_PATH.to_owned() } else { self.path.unwrap_or_default() };
        let mut config = ViewConfig::new(path);
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        config.load_depth = self.load_depth.unwrap_or(DEFAULT_LOAD_DEPTH);
        config.solution = self.solution.unwrap_or_default();
        config.playing = self.playing;
        config.collapse_as_exploring = self.collapse_as_exploring;
        config.log_file = self.log_file;
        config.right_path = self.right;
        config.diff_points_file = self.diff_points;
        config
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T) -> Result<(), ()> {
    if slot.is_some() {
        return Err(());
    }
    *slot = Some(value);
    Ok(())
}

fn set_flag(flag: &mut bool) -> Result<(), ()> {
    if *flag {
        return Err(());
    }
    *flag = true;
    Ok(())
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => set_flag(&mut options.demo)?,
            "--playing" => set_flag(&mut options.playing)?,
            "--collapse-as-exploring" => set_flag(&mut options.collapse_as_exploring)?,
            "--path" => set_once(&mut options.path, args.next().ok_or(())?)?,
            "--host" => set_once(&mut options.host, args.next().ok_or(())?)?,
            "--right" => set_once(&mut options.right, args.next().ok_or(())?)?,
            "--port" => {
                let raw = args.next().ok_or(())?;
                set_once(&mut options.port, raw.parse().map_err(|_| ())?)?;
            }
            "--load-depth" => {
                let raw = args.next().ok_or(())?;
                let depth: u32 = raw.parse().map_err(|_| ())?;
                if depth == 0 {
                    return Err(());
                }
                set_once(&mut options.load_depth, depth)?;
            }
            "--solution" => {
                let raw = args.next().ok_or(())?;
                let ids = parse_id_list(&raw).map_err(|_| ())?;
                set_once(&mut options.solution, ids)?;
            }
            "--log-file" => set_once(&mut options.log_file, PathBuf::from(args.next().ok_or(())?))?,
            "--diff-points" => {
                set_once(&mut options.diff_points, PathBuf::from(args.next().ok_or(())?))?
            }
            _ => return Err(()),
        }
    }

    if options.demo == options.path.is_some() {
        return Err(());
    }

    if options.right.is_some() != options.diff_points.is_some() {
        return Err(());
    }

    if options.demo && options.right.is_some() {
        return Err(());
    }

    Ok(options)
}

fn init_logging(path: &Path) -> Result<(), Box<dyn Error>> {
    let file = std::fs::File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .try_init()
        .map_err(|err| err as Box<dyn Error>)?;
    Ok(())
}

fn run_single<S: NodeSource>(
    runtime: &Runtime,
    source: S,
    config: &ViewConfig,
) -> Result<(), Box<dyn Error>> {
    let core = TraceCore::new(Vec::new(), config.solution.clone());
    let mut ctx = NavContext::new(config.solution.clone(), config.load_depth);
    ctx.playing = config.playing;
    ctx.collapse_as_exploring = config.collapse_as_exploring;

    let mut container = TreeContainer::new(source, config.path.as_str(), &core, ctx);
    let loaded = runtime.block_on(container.load_initial())?;
    tracing::info!(path = %config.path, loaded, "opened trace");

    tui::run(runtime, &mut TreeScreen::new(container))
}

fn run_merged(
    runtime: &Runtime,
    source: HttpNodeSource,
    config: &ViewConfig,
    right: &str,
    diff_points_file: &Path,
) -> Result<(), Box<dyn Error>> {
    let diff_points = load_diff_points(diff_points_file)?;
    let paths = [config.path.clone(), right.to_owned()];
    let title = format!("{} vs {}", paths[0], paths[1]);

    let view = runtime.block_on(MergedView::load(source, paths, diff_points, config.load_depth))?;
    tracing::info!(nodes = view.tree().node_count(), "merged traces");

    tui::run(runtime, &mut MergedScreen::new(title, view))
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "dualtree".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };
        let demo = options.demo;
        let mut config = options.into_config();

        if let Some(path) = &config.log_file {
            init_logging(path)?;
        }

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

        if demo {
            let core = demo_trace(DEMO_DEPTH);
            config.solution = core.sol_ancestor_ids.clone();
            let source = MemoryNodeSource::new().with_trace(DEMO_PATH, core.to_map());
            return run_single(&runtime, source, &config);
        }

        let source = HttpNodeSource::new(&config.server);
        tracing::info!(server = source.base_url(), "using visualisation server");
        match (config.right_path.clone(), config.diff_points_file.clone()) {
            (Some(right), Some(file)) => run_merged(&runtime, source, &config, &right, &file),
            _ => run_single(&runtime, source, &config),
        }
    })();

    if let Err(err) = result {
        eprintln!("dualtree: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{parse_options, CliOptions};
    use dualtree::config::{DEFAULT_LOAD_DEPTH, DEFAULT_PORT};
    use dualtree::loader::DEMO_PATH;
    use dualtree::model::NodeId;

    fn args(raw: &[&str]) -> impl Iterator<Item = String> {
        raw.iter().map(|arg| (*arg).to_owned()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn rejects_empty_args() {
        parse_options(std::iter::empty()).unwrap_err();
    }

    #[test]
    fn parses_single_trace_options() {
        let options = parse_options(args(&[
            "--path",
            "trace.json",
            "--port",
            "5100",
            "--load-depth",
            "2",
            "--solution",
            "0,3,7",
            "--playing",
        ]))
        .expect("parse options");

        let config = options.into_config();
        assert_eq!(config.path, "trace.json");
        assert_eq!(config.server.port, 5100);
        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.load_depth, 2);
        assert_eq!(config.solution, vec![NodeId::new(0), NodeId::new(3), NodeId::new(7)]);
        assert!(config.playing);
        assert!(!config.collapse_as_exploring);
        assert!(!config.is_dual());
    }

    #[test]
    fn defaults_apply_when_flags_are_missing() {
        let config = parse_options(args(&["--path", "t"])).expect("parse options").into_config();
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.load_depth, DEFAULT_LOAD_DEPTH);
        assert!(config.solution.is_empty());
        assert!(config.log_file.is_none());
    }

    #[test]
    fn parses_dual_trace_options() {
        let options = parse_options(args(&[
            "--path",
            "left.json",
            "--right",
            "right.json",
            "--diff-points",
            "diff.json",
        ]))
        .expect("parse options");
        assert_eq!(options.diff_points, Some(PathBuf::from("diff.json")));

        let config = options.into_config();
        assert!(config.is_dual());
        assert_eq!(config.right_path.as_deref(), Some("right.json"));
    }

    #[test]
    fn parses_demo_flag() {
        let options = parse_options(args(&["--demo", "--log-file", "out.log"])).expect("parse");
        assert!(options.demo);
        assert_eq!(options.log_file, Some(PathBuf::from("out.log")));
        assert_eq!(options.into_config().path, DEMO_PATH);
    }

    #[test]
    fn rejects_conflicting_or_incomplete_options() {
        parse_options(args(&["--demo", "--path", "t"])).unwrap_err();
        parse_options(args(&["--path", "a", "--path", "b"])).unwrap_err();
        parse_options(args(&["--path", "a", "--right", "b"])).unwrap_err();
        parse_options(args(&["--path", "a", "--diff-points", "d.json"])).unwrap_err();
        parse_options(args(&["--demo", "--right", "b", "--diff-points", "d"])).unwrap_err();
        parse_options(args(&["--path", "a", "--port", "http"])).unwrap_err();
        parse_options(args(&["--path", "a", "--load-depth", "0"])).unwrap_err();
        parse_options(args(&["--path", "a", "--solution", "0,x"])).unwrap_err();
        parse_options(args(&["--path", "a", "--verbose"])).unwrap_err();
        parse_options(args(&["--path"])).unwrap_err();
    }

    #[test]
    fn cli_options_default_is_empty() {
        assert_eq!(CliOptions::default().path, None);
    }
}
