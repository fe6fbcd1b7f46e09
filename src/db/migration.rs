use crate::{Error, Result};
use include_dir::include_dir;
use include_dir::Dir;
use rusqlite::Connection;
use tracing::info;

static MIGRATIONS_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/migrations");

/// Schema step stored as `migrations/<version>.sql`
struct SchemaStep {
    version: i64,
    sql: &'static str,
}

/// Applies every embedded schema step newer than the database and returns the
/// resulting schema version.
pub fn run(conn: &mut Connection) -> Result<i64> {
    apply(&embedded_steps()?, conn)
}

pub fn schema_version(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT user_version FROM pragma_user_version", [], |row| {
        row.get(0)
    })?)
}

fn embedded_steps() -> Result<Vec<SchemaStep>> {
    let mut steps = MIGRATIONS_DIR
        .files()
        .map(|file| {
            let path = file.path().display().to_string();
            let version = file
                .path()
                .file_stem()
                .and_then(|it| it.to_str())
                .and_then(|it| it.parse::<i64>().ok())
                .ok_or_else(|| Error::Generic(format!("Unexpected migration file: {path}")))?;
            let sql = file
                .contents_utf8()
                .ok_or_else(|| Error::Generic(format!("Migration {path} is not UTF-8")))?;
            Ok(SchemaStep { version, sql })
        })
        .collect::<Result<Vec<_>>>()?;
    steps.sort_by_key(|it| it.version);
    check_sequence(&steps)?;
    Ok(steps)
}

// versions must run 1, 2, 3... without holes, otherwise a database could skip a step
fn check_sequence(steps: &[SchemaStep]) -> Result<()> {
    for (expected, step) in (1..).zip(steps) {
        if step.version != expected {
            return Err(Error::Generic(format!(
                "Migration {expected} is missing, found {} instead",
                step.version
            )));
        }
    }
    Ok(())
}

fn apply(steps: &[SchemaStep], conn: &mut Connection) -> Result<i64> {
    let current = schema_version(conn)?;
    for step in steps.iter().filter(|it| it.version > current) {
        info!(version = step.version, "Applying schema migration");
        let tx = conn.transaction()?;
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        tx.commit()?;
    }
    let version = schema_version(conn)?;
    info!(version, "Database schema is up to date");
    Ok(version)
}

#[cfg(test)]
mod test {
    use super::SchemaStep;
    use crate::{Error, Result};
    use rusqlite::Connection;

    #[test]
    fn embedded_migrations_apply() -> Result<()> {
        let mut conn = Connection::open_in_memory()?;
        let steps = super::embedded_steps()?;
        assert!(!steps.is_empty());
        assert_eq!(steps.len() as i64, super::run(&mut conn)?);
        assert_eq!(steps.len() as i64, super::schema_version(&conn)?);
        // nothing left to apply
        assert_eq!(steps.len() as i64, super::run(&mut conn)?);
        Ok(())
    }

    #[test]
    fn applies_only_newer_steps() -> Result<()> {
        let mut conn = Connection::open_in_memory()?;
        let mut steps = vec![SchemaStep {
            version: 1,
            sql: "CREATE TABLE foo(bar);",
        }];
        assert_eq!(1, super::apply(&steps, &mut conn)?);
        steps.push(SchemaStep {
            version: 2,
            sql: "INSERT INTO foo (bar) VALUES ('qwerty');",
        });
        assert_eq!(2, super::apply(&steps, &mut conn)?);
        let rows: i64 = conn.query_row("SELECT count(*) FROM foo", [], |row| row.get(0))?;
        assert_eq!(1, rows);
        Ok(())
    }

    #[test]
    fn failed_step_is_rolled_back() -> Result<()> {
        let mut conn = Connection::open_in_memory()?;
        let steps = vec![
            SchemaStep {
                version: 1,
                sql: "CREATE TABLE foo(bar);",
            },
            SchemaStep {
                version: 2,
                sql: "CREATE TABLE baz(qux); INSERT INTO missing VALUES (1);",
            },
        ];
        assert!(super::apply(&steps, &mut conn).is_err());
        assert_eq!(1, super::schema_version(&conn)?);
        let baz: i64 = conn.query_row(
            "SELECT count(*) FROM sqlite_master WHERE name = 'baz'",
            [],
            |row| row.get(0),
        )?;
        assert_eq!(0, baz);
        Ok(())
    }

    #[test]
    fn gaps_are_rejected() {
        let steps = vec![
            SchemaStep {
                version: 1,
                sql: "",
            },
            SchemaStep {
                version: 3,
                sql: "",
            },
        ];
        assert!(matches!(
            super::check_sequence(&steps),
            Err(Error::Generic(_))
        ));
    }
}
