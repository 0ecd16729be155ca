//! CLI nbtcodec
//!
//! Преобразование NBT-документов в JSON и обратно, а также вывод
//! структуры документа в виде дерева.

use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Result;
use clap::{Parser, Subcommand};
use nbtcodec::{
    codec::{from_json_str_with, read_document, to_json_string, write_document},
    init_logging, CodecResult, CodecSettings, Compound, LogLevel, ResultExt, StackError, Tag,
};
use tracing::{debug, error, info, trace, warn};

/// Аргументы командной строки.
#[derive(Parser)]
#[command(name = "nbtcodec")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Decode, encode and inspect NBT documents", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Файл настроек (TOML, JSON, YAML)
    #[arg(short, long, env = "NBTCODEC_CONFIG", global = true)]
    config: Option<PathBuf>,
    /// Переопределить предел вложенности
    #[arg(long, global = true)]
    max_depth: Option<usize>,
    /// Подробный вывод (debug)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    /// Только ошибки
    #[arg(short, long, global = true)]
    quiet: bool,
    /// Печатать ошибку в stderr как JSON
    #[arg(long, global = true)]
    json_errors: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// NBT -> JSON (в stdout или в файл)
    ToJson {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Однострочный JSON без отступов
        #[arg(long)]
        compact: bool,
    },
    /// JSON -> NBT
    FromJson {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Записать без gzip-обёртки
        #[arg(long)]
        no_gzip: bool,
    },
    /// Вывести дерево документа с типами
    Inspect { input: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => exit_with(&e, cli.json_errors),
    };
    init_logging(&settings.logging)?;
    debug!(?settings, "settings loaded");

    if let Err(e) = handle_command(&cli.command, &settings) {
        exit_with(&e, cli.json_errors);
    }
    Ok(())
}

fn exit_with(
    err: &StackError,
    as_json: bool,
) -> ! {
    log_failure(err);
    match serde_json::to_string(&err.to_response()) {
        Ok(json) if as_json => eprintln!("{json}"),
        _ => {
            if err.is_critical() {
                // Внутренний сбой: вместе с цепочкой контекстов.
                eprintln!("Error: {err:?}");
            } else {
                eprintln!("Error: {err}");
            }
            if let Some(hint) = err
                .downcast_ref::<nbtcodec::NbtError>()
                .and_then(|e| e.recovery_hint())
            {
                eprintln!("Hint: {hint}");
            }
        }
    }
    std::process::exit(err.status_code().exit_code())
}

/// Пишет ошибку в журнал с уровнем, соответствующим её статусу.
fn log_failure(err: &StackError) {
    let tags = err.metrics_tags();
    match err.log_level() {
        LogLevel::Trace => trace!(error = %err, ?tags, "command failed"),
        LogLevel::Debug => debug!(error = %err, ?tags, "command failed"),
        LogLevel::Info => info!(error = %err, ?tags, "command failed"),
        LogLevel::Warn => warn!(error = %err, ?tags, "command failed"),
        LogLevel::Error => error!(error = %err, ?tags, "command failed"),
    }
}

fn load_settings(cli: &Cli) -> CodecResult<CodecSettings> {
    let mut settings = CodecSettings::load(cli.config.as_deref()).context("loading settings")?;
    if let Some(depth) = cli.max_depth {
        settings.max_depth = depth;
    }
    if cli.verbose {
        settings.logging.level = "debug".into();
    } else if cli.quiet {
        settings.logging.level = "error".into();
    }
    settings.validate()?;
    Ok(settings)
}

fn handle_command(
    command: &Commands,
    settings: &CodecSettings,
) -> CodecResult<()> {
    match command {
        Commands::ToJson {
            input,
            output,
            compact,
        } => {
            let root = load_document(input, settings)?;
            let json = to_json_string(&root, !compact)
                .with_context(|| format!("converting {} to JSON", input.display()))?;
            match output {
                Some(path) => {
                    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?
                }
                None => println!("{json}"),
            }
            Ok(())
        }
        Commands::FromJson {
            input,
            output,
            no_gzip,
        } => {
            let text = fs::read_to_string(input)
                .with_context(|| format!("reading {}", input.display()))?;
            let root = from_json_str_with(&text, settings.max_depth)
                .with_context(|| format!("parsing {}", input.display()))?;
            let bytes = write_document(&root, &settings.encode_options(!no_gzip))
                .with_context(|| format!("encoding {}", input.display()))?;
            fs::write(output, &bytes).with_context(|| format!("writing {}", output.display()))?;
            info!(
                entries = root.len(),
                bytes = bytes.len(),
                output = %output.display(),
                "document written"
            );
            Ok(())
        }
        Commands::Inspect { input } => {
            let root = load_document(input, settings)?;
            print!("{}", render_outline(&root));
            Ok(())
        }
    }
}

fn load_document(
    path: &Path,
    settings: &CodecSettings,
) -> CodecResult<Compound> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    read_document(&bytes, &settings.decode_options())
        .with_context(|| format!("decoding {}", path.display()))
}

/// Дерево с типами: по строке на значение, отступ в два пробела.
fn render_outline(root: &Compound) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "TAG_Compound ({} entries)", root.len());
    outline_compound(&mut out, root, 1);
    out
}

fn outline_compound(
    out: &mut String,
    compound: &Compound,
    indent: usize,
) {
    for (key, value) in compound {
        outline_value(out, &format!("{key:?}"), value, indent);
    }
}

fn outline_value(
    out: &mut String,
    label: &str,
    tag: &Tag,
    indent: usize,
) {
    let pad = "  ".repeat(indent);
    let name = tag.type_name();
    // Запись в String не может завершиться ошибкой.
    let _ = match tag {
        Tag::Byte(v) => writeln!(out, "{pad}{label}: {name} {v}"),
        Tag::Short(v) => writeln!(out, "{pad}{label}: {name} {v}"),
        Tag::Int(v) => writeln!(out, "{pad}{label}: {name} {v}"),
        Tag::Long(v) => writeln!(out, "{pad}{label}: {name} {v}"),
        Tag::Float(v) => writeln!(out, "{pad}{label}: {name} {v}"),
        Tag::Double(v) => writeln!(out, "{pad}{label}: {name} {v}"),
        Tag::String(s) => writeln!(out, "{pad}{label}: {name} {s:?}"),
        Tag::ByteArray(v) => writeln!(out, "{pad}{label}: {name} [{} bytes]", v.len()),
        Tag::IntArray(v) => writeln!(out, "{pad}{label}: {name} [{} ints]", v.len()),
        Tag::ShortArray(v) => writeln!(out, "{pad}{label}: {name} [{} shorts]", v.len()),
        Tag::List(list) => {
            let r = writeln!(
                out,
                "{pad}{label}: {name} of {} ({} entries)",
                list.element_type(),
                list.len()
            );
            for (i, element) in list.iter().enumerate() {
                outline_value(out, &format!("[{i}]"), element, indent + 1);
            }
            r
        }
        Tag::Compound(c) => {
            let r = writeln!(out, "{pad}{label}: {name} ({} entries)", c.len());
            outline_compound(out, c, indent + 1);
            r
        }
    };
}

#[cfg(test)]
mod tests {
    use nbtcodec::{codec::is_gzip, EncodeOptions, List, NbtError, StatusCode, TagType};
    use tempfile::tempdir;

    use super::*;

    /// Документ с 60 вложенными Compound: в JSON это больше 128 уровней.
    fn deep_document() -> Compound {
        let mut root = Compound::new();
        root.insert("name".into(), Tag::from("steve"));
        let pos = List::new(TagType::Double, vec![Tag::Double(0.5), Tag::Double(-2.0)]).unwrap();
        root.insert("pos".into(), Tag::List(pos));
        root.insert("blocks".into(), Tag::ByteArray(vec![0, 1, 255]));
        for _ in 0..60 {
            let mut outer = Compound::new();
            outer.insert("child".into(), Tag::Compound(root));
            root = outer;
        }
        root
    }

    #[test]
    fn test_to_json_from_json_inspect() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("level.dat");
        let json = dir.path().join("level.json");
        let output = dir.path().join("out.dat");
        let settings = CodecSettings::default();

        let root = deep_document();
        let options = EncodeOptions {
            gzip: Some(6),
            ..EncodeOptions::default()
        };
        fs::write(&input, write_document(&root, &options).unwrap()).unwrap();

        handle_command(
            &Commands::ToJson {
                input: input.clone(),
                output: Some(json.clone()),
                compact: false,
            },
            &settings,
        )
        .unwrap();
        handle_command(
            &Commands::FromJson {
                input: json,
                output: output.clone(),
                no_gzip: false,
            },
            &settings,
        )
        .unwrap();

        let bytes = fs::read(&output).unwrap();
        assert!(is_gzip(&bytes));
        assert_eq!(load_document(&output, &settings).unwrap(), root);

        handle_command(&Commands::Inspect { input: output }, &settings).unwrap();
    }

    #[test]
    fn test_from_json_without_gzip() {
        let dir = tempdir().unwrap();
        let json = dir.path().join("in.json");
        let output = dir.path().join("out.nbt");
        fs::write(&json, r#"{"a":{"Short":5}}"#).unwrap();

        handle_command(
            &Commands::FromJson {
                input: json,
                output: output.clone(),
                no_gzip: true,
            },
            &CodecSettings::default(),
        )
        .unwrap();
        assert_eq!(
            fs::read(&output).unwrap(),
            [0x0A, 0x00, 0x00, 0x02, 0x00, 0x01, 0x61, 0x00, 0x05, 0x00]
        );
    }

    #[test]
    fn test_to_json_respects_max_depth() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("level.dat");
        fs::write(&input, write_document(&deep_document(), &EncodeOptions::default()).unwrap())
            .unwrap();

        let settings = CodecSettings {
            max_depth: 10,
            ..CodecSettings::default()
        };
        let err = handle_command(
            &Commands::ToJson {
                input,
                output: None,
                compact: true,
            },
            &settings,
        )
        .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::DepthLimit);
        assert_eq!(err.status_code().exit_code(), 3);
        assert_eq!(
            err.downcast_ref::<NbtError>(),
            Some(&NbtError::DepthExceeded { depth: 11, max: 10 })
        );
    }

    #[test]
    fn test_inspect_rejects_non_document() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("bad.dat");
        fs::write(&input, [0x08, 0x00, 0x00]).unwrap();

        let err = handle_command(&Commands::Inspect { input }, &CodecSettings::default())
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::MissingRootCompound);
        assert_eq!(err.log_level(), LogLevel::Info);
        assert!(!err.is_critical());
        assert!(err.to_string().contains("decoding"));
    }

    #[test]
    fn test_max_depth_override_validated() {
        let cli = Cli::try_parse_from(["nbtcodec", "inspect", "level.dat", "--max-depth", "100000"])
            .unwrap();
        let err = load_settings(&cli).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::InvalidConfig);
    }

    #[test]
    fn test_outline() {
        let mut inner = Compound::new();
        inner.insert("x".into(), Tag::Double(0.5));
        let mut root = Compound::new();
        root.insert("name".into(), Tag::from("steve"));
        root.insert(
            "pos".into(),
            Tag::List(List::new(TagType::Int, vec![Tag::Int(1), Tag::Int(2)]).unwrap()),
        );
        root.insert("inner".into(), Tag::Compound(inner));

        let expected = "\
TAG_Compound (3 entries)
  \"name\": TAG_String \"steve\"
  \"pos\": TAG_List of TAG_Int (2 entries)
    [0]: TAG_Int 1
    [1]: TAG_Int 2
  \"inner\": TAG_Compound (1 entries)
    \"x\": TAG_Double 0.5
";
        assert_eq!(render_outline(&root), expected);
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["nbtcodec", "from-json", "in.json", "-o", "out.nbt", "--no-gzip"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::FromJson { no_gzip: true, .. }
        ));

        let cli = Cli::try_parse_from(["nbtcodec", "inspect", "level.dat", "--max-depth", "8"]).unwrap();
        assert_eq!(cli.max_depth, Some(8));
    }
}
