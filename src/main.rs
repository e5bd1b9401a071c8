// std imports
use std::{
    fs,
    io::{self, BufRead, BufReader, BufWriter, Write, stdin, stdout},
    path::Path,
    process,
};

// third-party imports
use clap::Parser;
use env_logger::{self as logger};

// local imports
use plq::{
    PlaylistItem, Query,
    cli::Opt,
    config,
    error::*,
    settings::Settings,
};

const PLQ_DEBUG_LOG: &str = "PLQ_DEBUG_LOG";
const PLQ_DEBUG_LOG_STYLE: &str = "PLQ_DEBUG_LOG_STYLE";

// ---

fn bootstrap(opt: &Opt) -> Result<Settings> {
    if std::env::var(PLQ_DEBUG_LOG).is_ok() {
        logger::Builder::from_env(logger::Env::new().filter(PLQ_DEBUG_LOG).write_style(PLQ_DEBUG_LOG_STYLE))
            .format_timestamp_micros()
            .init();
        log::debug!("logging initialized");
    } else {
        logger::Builder::new()
            .filter_level(log::LevelFilter::Error)
            .format_timestamp_millis()
            .init()
    }

    let (configs, no_default) = opt.configs();
    config::at(configs).no_default(no_default).load()
}

fn run() -> Result<()> {
    let opt = Opt::parse();
    let settings = bootstrap(&opt)?;

    let templates = settings.templates()?;
    let query = plq::parse_with_templates(&opt.query, &templates)?;

    if opt.explain {
        println!("{}", query);
        return Ok(());
    }

    let mode = opt.mode.unwrap_or(settings.mode);
    log::debug!("filter mode: {mode}");

    let mut output = BufWriter::new(stdout().lock());

    let result = if opt.files.is_empty() {
        process_input(&query, mode, stdin().lock(), &mut output)
    } else {
        opt.files.iter().try_for_each(|path| {
            if path.as_os_str() == "-" {
                process_input(&query, mode, stdin().lock(), &mut output)
            } else {
                process_input(&query, mode, open(path)?, &mut output)
            }
        })
    };

    match result.and_then(|()| output.flush().map_err(Error::Io)) {
        Err(Error::Io(ref e)) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        result => result,
    }
}

fn open(path: &Path) -> Result<BufReader<fs::File>> {
    match fs::File::open(path) {
        Ok(file) => Ok(BufReader::new(file)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::FileNotFound {
            filename: path.to_string_lossy().into_owned(),
        }),
        Err(e) => Err(e.into()),
    }
}

fn process_input(query: &Query, mode: plq::FilterMode, input: impl BufRead, output: &mut impl Write) -> Result<()> {
    let items = json::Deserializer::from_reader(input).into_iter::<PlaylistItem>();
    let mut error = None;
    let items = items.map_while(|item| item.map_err(|e| error = Some(e)).ok());

    for item in query.select(items, mode) {
        let mut line = json::to_vec(&item)?;
        line.push(b'\n');
        output.write_all(&line)?;
    }

    match error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

fn main() {
    if let Err(err) = run() {
        err.log(&AppInfo);
        process::exit(1);
    }
}

struct AppInfo;

impl AppInfoProvider for AppInfo {}
