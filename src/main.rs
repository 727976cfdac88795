use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command};
use clap::parser::ValueSource;
use colored::*;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use netsweep::{
    config::ScanConfig,
    output::OutputManager,
    ports::parse_ports,
    scanner::engine::ScanEngine,
    target::HostSpec,
    ScanError,
};

// Ulimit adjustment for Unix systems: a 200-worker connect scan can hold
// a few hundred sockets at once.
#[cfg(unix)]
fn adjust_ulimit_size(ulimit: Option<u64>) -> u64 {
    use rlimit::Resource;

    if let Some(limit) = ulimit {
        if Resource::NOFILE.set(limit, limit).is_ok() {
            log::info!("raised open-file limit to {}", limit);
        } else {
            eprintln!("{}", "[!] failed to raise open-file limit".bright_yellow());
        }
    }

    match Resource::NOFILE.get() {
        Ok((soft, _)) => soft,
        Err(_) => 65_535,
    }
}

#[cfg(not(unix))]
fn adjust_ulimit_size(_ulimit: Option<u64>) -> u64 {
    65_535
}

fn build_cli() -> Command {
    Command::new("netsweep")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Concurrent TCP reachability scanner")
        .arg(
            Arg::new("network")
                .short('n')
                .long("network")
                .value_name("CIDR")
                .help("Network to scan in CIDR notation, e.g. 192.168.1.0/24"),
        )
        .arg(
            Arg::new("hosts-file")
                .short('f')
                .long("hosts-file")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Read hosts from file, one IP/hostname per line"),
        )
        .arg(
            Arg::new("start-end")
                .long("start-end")
                .num_args(2)
                .value_names(["START_IP", "END_IP"])
                .help("Inclusive IP range, e.g. --start-end 192.168.1.10 192.168.1.50"),
        )
        .arg(
            Arg::new("host")
                .short('H')
                .long("host")
                .value_name("HOST")
                .help("Single host or IP, e.g. 192.168.1.15"),
        )
        .group(
            ArgGroup::new("target")
                .args(["network", "hosts-file", "start-end", "host"])
                .required(true)
                .multiple(false),
        )
        .arg(
            Arg::new("ports")
                .short('p')
                .long("ports")
                .value_name("SPEC")
                .required(true)
                .help("Ports to scan: single/comma list/range, e.g. 22 or 22,80,8000-8010"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_name("SECS")
                .value_parser(clap::value_parser!(f64))
                .default_value("0.5")
                .help("TCP connect timeout in seconds"),
        )
        .arg(
            Arg::new("workers")
                .short('w')
                .long("workers")
                .value_name("COUNT")
                .value_parser(clap::value_parser!(usize))
                .default_value("200")
                .help("Number of concurrent probe workers"),
        )
        .arg(
            Arg::new("ping-first")
                .long("ping-first")
                .action(ArgAction::SetTrue)
                .help("Ping hosts first and skip the unreachable ones"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Output file; extension selects the format (.csv or .json)"),
        )
        .arg(
            Arg::new("no-print")
                .long("no-print")
                .action(ArgAction::SetTrue)
                .help("Do not print open ports to the console"),
        )
        .arg(
            Arg::new("ulimit")
                .short('u')
                .long("ulimit")
                .value_name("LIMIT")
                .value_parser(clap::value_parser!(u64))
                .help("Raise the open-file limit to this value (Unix)"),
        )
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let matches = build_cli().get_matches();

    if let Err(e) = run(&matches).await {
        eprintln!("{} {}", "error:".bright_red().bold(), e);
        process::exit(1);
    }
}

async fn run(matches: &ArgMatches) -> netsweep::Result<()> {
    adjust_ulimit_size(matches.get_one::<u64>("ulimit").copied());

    let spec = host_spec_from_matches(matches)?;
    let hosts = spec.expand()?;

    let ports = parse_ports(matches.get_one::<String>("ports").expect("required arg"))?;
    if ports.is_empty() {
        return Err(ScanError::EmptyPortSpec);
    }

    // ~/.netsweep.toml supplies defaults; explicit CLI flags win.
    let file_defaults = ScanConfig::load_default_config();
    let timeout = match matches.value_source("timeout") {
        Some(ValueSource::CommandLine) => Duration::from_secs_f64(
            *matches.get_one::<f64>("timeout").expect("has default"),
        ),
        _ => file_defaults.timeout_duration(),
    };
    let workers = match matches.value_source("workers") {
        Some(ValueSource::CommandLine) => {
            *matches.get_one::<usize>("workers").expect("has default")
        }
        _ => file_defaults.workers,
    };

    let output_path = matches.get_one::<PathBuf>("output").cloned();
    let no_print = matches.get_flag("no-print");

    let config = ScanConfig::new(hosts, ports)
        .with_timeout(timeout)
        .with_workers(workers)
        .with_ping_first(matches.get_flag("ping-first"))
        .with_print_open(!no_print);

    let engine = ScanEngine::new(config)?;
    let report = engine.scan().await?;

    log::info!(
        "{} of {} probes open in {:.2}s",
        report.open_pairs.len(),
        report.total_tasks,
        report.duration.as_secs_f64()
    );

    match output_path {
        Some(path) => {
            OutputManager::write_to_file(&report.open_pairs, &path)?;
            println!(
                "{} {} open pair(s) written to {}",
                "[~]".bright_blue(),
                report.open_pairs.len(),
                path.display()
            );
        }
        None => {
            if !no_print {
                OutputManager::print_console(&report.open_pairs);
            }
        }
    }

    Ok(())
}

fn host_spec_from_matches(matches: &ArgMatches) -> netsweep::Result<HostSpec> {
    if let Some(cidr) = matches.get_one::<String>("network") {
        return Ok(HostSpec::Cidr(cidr.clone()));
    }
    if let Some(path) = matches.get_one::<PathBuf>("hosts-file") {
        return Ok(HostSpec::File(path.clone()));
    }
    if let Some(mut range) = matches.get_many::<String>("start-end") {
        let start = range.next().expect("clap enforces two values").clone();
        let end = range.next().expect("clap enforces two values").clone();
        return Ok(HostSpec::Range(start, end));
    }
    if let Some(host) = matches.get_one::<String>("host") {
        return Ok(HostSpec::Host(host.clone()));
    }

    // The clap group is required, so one branch above always matches.
    Err(ScanError::InvalidTargetSpec(
        "no target specified".to_string(),
    ))
}
