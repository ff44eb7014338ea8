//! `termvis` command-line host.
//!
//! # Responsibility
//! - Drive the visibility facade against a SQLite file for scripting and
//!   manual inspection.
//! - Keep output line-oriented and deterministic.

use clap::{Parser, Subcommand};
use log::error;
use rusqlite::Connection;
use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use std::sync::Arc;
use termvis_core::db::open_db;
use termvis_core::{
    init_logging_from_config, parse_scope, AssignmentChange, AssignmentStore, CacheInvalidator,
    CacheOutcome, CachedMetadataStore, CoreConfig, EntityId, MetadataStore, PresentationAdapter,
    SqliteMetadataStore, VisibilityColumn, VisibilityService,
};

#[derive(Debug, Parser)]
#[command(name = "termvis", version, about = "Term visibility assignments")]
struct Cli {
    /// SQLite database file holding term metadata.
    #[arg(long, default_value = "termvis.db")]
    db: PathBuf,
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Absolute log directory; overrides the config value.
    #[arg(long)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List registered visibility options.
    Options,
    /// Print the raw stored value of an entity; prints nothing when unassigned.
    Get { entity: String },
    /// Assign a registered visibility value.
    Set {
        entity: String,
        scope: String,
        value: String,
        /// Evict the entity's cached metadata after the write.
        #[arg(long)]
        clean_cache: bool,
        /// Store the value even when it is not a registered option.
        #[arg(long)]
        force: bool,
    },
    /// Remove an entity's visibility.
    Clear { entity: String, scope: String },
    /// Print the display label of an entity.
    Render { entity: String },
    /// Print `entity<TAB>label` rows sorted by stored value.
    Column { entities: Vec<String> },
}

type CliStore<'conn> = Rc<CachedMetadataStore<SqliteMetadataStore<'conn>>>;
type CliService<'conn> = VisibilityService<CliStore<'conn>, CliStore<'conn>>;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("termvis: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = match cli.config.as_deref() {
        Some(path) => CoreConfig::load(path)?,
        None => CoreConfig::default(),
    };
    if let Some(dir) = cli.log_dir {
        config.logging.dir = Some(dir);
    }
    init_logging_from_config(&config.logging)?;

    let conn = open_db(&cli.db)?;
    let service = build_service(&conn, &config)?;
    let stdout = std::io::stdout();
    execute(&service, cli.command, &mut stdout.lock())
}

/// Wires the facade over SQLite behind a read-through cache that is also the
/// invalidator, so `--clean-cache` evicts the entity's cached keys.
fn build_service<'conn>(
    conn: &'conn Connection,
    config: &CoreConfig,
) -> Result<CliService<'conn>, Box<dyn Error>> {
    let cached = Rc::new(CachedMetadataStore::new(SqliteMetadataStore::try_new(conn)?));
    let store = AssignmentStore::with_meta_key(Rc::clone(&cached), cached, config.meta_key.as_str());
    let registry = Arc::new(config.registry_builder().build());
    Ok(VisibilityService::new(
        store,
        PresentationAdapter::new(registry, config.sentinel.as_str()),
    ))
}

fn execute<M, C>(
    service: &VisibilityService<M, C>,
    command: Command,
    out: &mut impl Write,
) -> Result<(), Box<dyn Error>>
where
    M: MetadataStore,
    C: CacheInvalidator,
{
    match command {
        Command::Options => {
            for option in service.list_visibility_options() {
                writeln!(out, "{}\t{}", option.id, option.label)?;
            }
        }
        Command::Get { entity } => {
            let entity = EntityId::parse(&entity)?;
            if let Some(value) = service.get_visibility(&entity)? {
                writeln!(out, "{value}")?;
            }
        }
        Command::Set {
            entity,
            scope,
            value,
            clean_cache,
            force,
        } => {
            let entity = EntityId::parse(&entity)?;
            let scope = parse_scope(&scope)?;
            let outcome = if force {
                service.set_visibility(&entity, &scope, &value, clean_cache)?
            } else {
                service.submit_visibility(&entity, &scope, &value, clean_cache)?
            };
            writeln!(out, "{}", describe_change(outcome.change))?;
            if let CacheOutcome::Failed(message) = &outcome.cache {
                writeln!(out, "cache invalidation failed: {message}")?;
            }
        }
        Command::Clear { entity, scope } => {
            let entity = EntityId::parse(&entity)?;
            let scope = parse_scope(&scope)?;
            let outcome = service.set_visibility(&entity, &scope, "", false)?;
            writeln!(out, "{}", describe_change(outcome.change))?;
        }
        Command::Render { entity } => {
            let entity = EntityId::parse(&entity)?;
            writeln!(out, "{}", service.render_visibility_label(&entity)?)?;
        }
        Command::Column { entities } => {
            let mut rows = entities
                .iter()
                .map(|raw| EntityId::parse(raw))
                .collect::<Result<Vec<_>, _>>()?;
            let column = VisibilityColumn::new(service);
            column.sort(&mut rows);
            for entity in &rows {
                writeln!(out, "{entity}\t{}", column.cell(entity))?;
            }
        }
    }

    Ok(())
}

fn describe_change(change: AssignmentChange) -> &'static str {
    match change {
        AssignmentChange::Stored => "stored",
        AssignmentChange::Cleared => "cleared",
        AssignmentChange::AlreadyAbsent => "unchanged",
    }
}

#[cfg(test)]
mod tests {
    use super::{build_service, execute, Cli, CliService, Command};
    use clap::{CommandFactory, Parser};
    use termvis_core::db::open_db_in_memory;
    use termvis_core::{CoreConfig, EntityId, MetadataStore};

    fn run_command(service: &CliService<'_>, args: &[&str]) -> String {
        let cli = Cli::parse_from(std::iter::once("termvis").chain(args.iter().copied()));
        let mut out = Vec::new();
        execute(service, cli.command, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_set_with_flags() {
        let cli = Cli::parse_from([
            "termvis",
            "--db",
            "/tmp/x.db",
            "set",
            "42",
            "category",
            "hidden",
            "--clean-cache",
        ]);
        match cli.command {
            Command::Set {
                entity,
                scope,
                value,
                clean_cache,
                force,
            } => {
                assert_eq!(entity, "42");
                assert_eq!(scope, "category");
                assert_eq!(value, "hidden");
                assert!(clean_cache);
                assert!(!force);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn get_prints_nothing_for_unassigned_entity() {
        let conn = open_db_in_memory().unwrap();
        let service = build_service(&conn, &CoreConfig::default()).unwrap();

        assert_eq!(run_command(&service, &["get", "42"]), "");
        assert_eq!(run_command(&service, &["render", "42"]), "—\n");

        run_command(&service, &["set", "42", "category", "hidden"]);
        assert_eq!(run_command(&service, &["get", "42"]), "hidden\n");
    }

    #[test]
    fn clean_cache_flag_evicts_entity_from_cache() {
        let conn = open_db_in_memory().unwrap();
        let service = build_service(&conn, &CoreConfig::default()).unwrap();
        let cache = service.store().meta();
        let entity = EntityId::from(42_u64);

        run_command(&service, &["set", "42", "category", "hidden"]);
        assert_eq!(cache.cached_len(), 1);

        // Out-of-band SQLite write stays hidden behind the cached value.
        cache
            .inner()
            .set_meta(&entity, "visibility", "private")
            .unwrap();
        assert_eq!(run_command(&service, &["render", "42"]), "Hidden\n");

        run_command(&service, &["set", "7", "category", "public", "--clean-cache"]);
        assert_eq!(run_command(&service, &["render", "42"]), "Hidden\n");

        run_command(&service, &["set", "42", "category", "public", "--clean-cache"]);
        assert_eq!(cache.cached_len(), 0);
        assert_eq!(run_command(&service, &["get", "42"]), "public\n");
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn set_rejects_unregistered_value_without_force() {
        let conn = open_db_in_memory().unwrap();
        let service = build_service(&conn, &CoreConfig::default()).unwrap();

        let cli = Cli::parse_from(["termvis", "set", "42", "category", "archived"]);
        let mut out = Vec::new();
        assert!(execute(&service, cli.command, &mut out).is_err());

        assert_eq!(
            run_command(&service, &["set", "42", "category", "archived", "--force"]),
            "stored\n"
        );
        assert_eq!(run_command(&service, &["render", "42"]), "—\n");
    }
}
