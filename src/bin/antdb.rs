use antdb::core::db::StatementType;
use antdb::{load_config, AntDb, SqlValue};
use std::process::ExitCode;
use tracing::info;

const USAGE: &str = "usage: antdb <config.toml> <sql> [param ...]";

fn main() -> ExitCode {
    // Logs go to stderr so stdout only carries results
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    }

    let config = match load_config(&args[0]) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config {}: {}", args[0], e);
            return ExitCode::FAILURE;
        }
    };

    info!("Starting antdb...");
    let mut db = AntDb::new(config);
    if !db.is_connected() {
        let _ = db.connect(None);
    }

    let sql = &args[1];
    let params: Vec<SqlValue> = args[2..].iter().map(SqlValue::from).collect();

    let outcome = if StatementType::from_sql(sql).returns_rows() {
        db.read(sql, params, &[]).map(|rows| {
            for row in rows {
                println!("{}", row.to_json());
            }
        })
    } else {
        db.write(sql, params, &[])
            .map(|affected| println!("{} row(s) affected", affected))
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => {
            for record in db.errors() {
                eprintln!("{}", record);
            }
            ExitCode::FAILURE
        }
    }
}
