#![cfg(feature = "sqlite")]

use sql_helper::prelude::*;
use tokio::runtime::Runtime;

fn memory_db() -> DbConnection {
    DbConnection::new(ConnectionConfig::new(DriverKind::Sqlite).database(":memory:"))
}

#[test]
fn crud_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let mut db = memory_db();
        db.connect().await?;

        db.exec_batch(
            "CREATE TABLE users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                age INTEGER,
                status TEXT
            );",
        )
        .await?;

        // Insert returns the constant success marker, never a row count.
        let outcome = db
            .insert(
                "users",
                &[
                    ("name", RowValues::Text("Bob".into())),
                    ("age", RowValues::Int(30)),
                    ("status", RowValues::Text("active".into())),
                ],
            )
            .await?;
        assert!(matches!(outcome, QueryOutcome::Done));
        assert_eq!(db.result_count(), 0);
        assert_eq!(db.inserted_id()?, 1);

        db.insert(
            "users",
            &[
                ("name", RowValues::Text("Ann".into())),
                ("age", RowValues::Int(17)),
                ("status", RowValues::Text("active".into())),
            ],
        )
        .await?;
        assert_eq!(db.inserted_id()?, 2);

        // Fetch with the where mini-language; the null-valued key is raw SQL.
        let rows = db
            .fetch(
                "users",
                Fetch::new().conditions(&[
                    ("age >=", Some(RowValues::Int(18))),
                    ("status = 'active'", None),
                ]),
            )
            .await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.rows[0].get("name"), Some(&RowValues::Text("Bob".into())));
        assert_eq!(db.result_count(), 1);

        db.update(
            "users",
            &[("age", RowValues::Int(18))],
            &[("name", Some(RowValues::Text("Ann".into())))],
        )
        .await?;

        let rows = db
            .fetch(
                "users",
                Fetch::new().conditions(&[("age >=", Some(RowValues::Int(18)))]),
            )
            .await?;
        assert_eq!(rows.len(), 2);
        assert_eq!(db.result_count(), 2);

        db.delete("users", &[("name", Some(RowValues::Text("Bob".into())))])
            .await?;
        let rows = db.fetch("users", Fetch::new()).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.rows[0].get("name"), Some(&RowValues::Text("Ann".into())));

        // Delete without conditions clears the table.
        db.delete("users", &[]).await?;
        let rows = db.fetch("users", Fetch::new()).await?;
        assert!(rows.is_empty());

        db.disconnect();
        Ok(())
    })
}

#[test]
fn exec_dispatches_reads_and_writes() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let mut db = memory_db();
        db.connect().await?;
        db.exec_batch("CREATE TABLE t (a INTEGER, b TEXT);").await?;

        let outcome = db
            .exec(
                "INSERT INTO t (a, b) VALUES (?, ?)",
                &[RowValues::Int(1), RowValues::Text("one".into())],
            )
            .await?;
        assert!(matches!(outcome, QueryOutcome::Done));

        // Multi-line statements are flattened before submission.
        let outcome = db
            .exec("SELECT a,\n       b\nFROM t\nWHERE a = ?", &[RowValues::Int(1)])
            .await?;
        let rows = outcome.into_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.rows[0].get("b"), Some(&RowValues::Text("one".into())));

        // Empty result is an empty set, not an error.
        let rows = db
            .exec("SELECT * FROM t WHERE a = ?", &[RowValues::Int(99)])
            .await?
            .into_rows();
        assert!(rows.is_empty());
        assert_eq!(db.result_count(), 0);

        Ok(())
    })
}

#[test]
fn exec_runs_exactly_one_statement() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let mut db = memory_db();
        db.connect().await?;
        db.exec_batch("CREATE TABLE t (a INTEGER, b TEXT);").await?;

        // A write with no bound values still runs through the
        // single-statement path.
        db.exec("INSERT INTO t (a, b) VALUES (1, 'one')", &[]).await?;

        // A second statement piggybacked on the first is rejected; scripts
        // belong in exec_batch.
        let err = db
            .exec("INSERT INTO t (a, b) VALUES (2, 'two'); DROP TABLE t", &[])
            .await
            .unwrap_err();
        assert!(err.is_driver());

        // The table survived and only the first insert landed.
        let rows = db.fetch("t", Fetch::new().order(&[])).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.rows[0].get("a"), Some(&RowValues::Int(1)));
        Ok(())
    })
}

#[test]
fn value_types_survive_storage() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let mut db = memory_db();
        db.connect().await?;
        db.exec_batch("CREATE TABLE v (i INTEGER, f REAL, t TEXT, n TEXT, bl BLOB);")
            .await?;

        db.insert(
            "v",
            &[
                ("i", RowValues::Int(-5)),
                ("f", RowValues::Float(2.5)),
                ("t", RowValues::Text("hello".into())),
                ("n", RowValues::Null),
                ("bl", RowValues::Blob(vec![1, 2, 3])),
            ],
        )
        .await?;

        let rows = db.fetch("v", Fetch::new().order(&[])).await?;
        let row = &rows.rows[0];
        assert_eq!(row.get("i"), Some(&RowValues::Int(-5)));
        assert_eq!(row.get("f"), Some(&RowValues::Float(2.5)));
        assert_eq!(row.get("t").and_then(|v| v.as_text()), Some("hello"));
        assert!(row.get("n").is_some_and(RowValues::is_null));
        assert_eq!(row.get("bl").and_then(|v| v.as_blob()), Some(&[1u8, 2, 3][..]));
        Ok(())
    })
}

#[test]
fn file_backed_database_persists_within_connection() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("crud.db");
    let path = path.to_str().expect("utf-8 temp path").to_string();

    rt.block_on(async {
        let mut db =
            DbConnection::new(ConnectionConfig::new(DriverKind::Sqlite).database(&path));
        db.connect().await?;
        db.exec_batch("CREATE TABLE t (a INTEGER);").await?;
        db.insert("t", &[("a", RowValues::Int(42))]).await?;
        db.disconnect();

        // Reopen the same file; the row is still there.
        let mut db =
            DbConnection::new(ConnectionConfig::new(DriverKind::Sqlite).database(&path));
        db.connect().await?;
        let rows = db.fetch("t", Fetch::new().order(&[])).await?;
        assert_eq!(rows.rows[0].get("a"), Some(&RowValues::Int(42)));
        db.disconnect();
        Ok::<_, SqlHelperError>(())
    })?;
    Ok(())
}
