//! Command execution (§4.K, §6 wire protocol): turn one request string
//! into a reply string by parsing it (§4.H), running it against the
//! database, and formatting `OK\n<body>` or `ERR <message>\n`.

use std::sync::Arc;

use crate::db::Database;
use crate::ingest;
use crate::lang::{self, Command};
use crate::posting::QueryCounters;
use crate::query;

/// Parse and execute one request, always returning a reply string — never
/// an `Err`, since a failure at any stage becomes an `ERR ...\n` body
/// rather than propagating past the wire (§6 "Error taxonomy").
pub fn handle_request(db: &Arc<Database>, conn_id: &str, request: &str) -> String {
    let command = match lang::parse_command(request) {
        Ok(command) => command,
        Err(err) => return format!("ERR {}\n", err),
    };

    let task = db.new_task(conn_id.to_string(), request.to_string(), estimate(&command));
    match execute(db, &command, &task) {
        Ok(body) => format!("OK\n{}", body),
        Err(err) => format!("ERR {}\n", err),
    }
}

fn estimate(command: &Command) -> u64 {
    match command {
        Command::Index { .. } | Command::Reindex { .. } => 1,
        _ => 0,
    }
}

fn execute(db: &Arc<Database>, command: &Command, task: &crate::snapshot::Task) -> crate::Result<String> {
    match command {
        Command::Select(query) => {
            let snapshot = db.snapshot();
            let kinds = crate::ngram::ALL_KINDS.to_vec();
            let mut counters = QueryCounters::default();
            let datasets = snapshot.datasets.iter().map(|d| d.as_ref());
            let paths = query::evaluate_all(query, datasets, &kinds, Some(&mut counters))?;
            task.advance(1);
            let mut body = String::new();
            for path in paths {
                body.push_str(&path);
                body.push('\n');
            }
            Ok(body)
        }
        Command::Index { path, kinds } => {
            let files = ingest::collect_files(std::path::Path::new(path))?;
            db.index_path(files, kinds, Some(task))?;
            Ok(format!("indexed {}\n", path))
        }
        Command::Reindex { dataset_id, kinds } => {
            db.reindex(dataset_id, kinds, Some(task))?;
            Ok(format!("reindexed {}\n", dataset_id))
        }
        Command::Compact { smart } => {
            db.compact(*smart)?;
            task.advance(1);
            Ok("compacted\n".to_string())
        }
        Command::Status => {
            let snapshot = db.snapshot();
            let mut body = String::new();
            for task in snapshot.tasks.lock().unwrap().iter() {
                body.push_str(&format!(
                    "{}\t{}\t{}\t{}\t{}\n",
                    task.id,
                    task.work_done(),
                    task.work_estimated,
                    task.conn_id,
                    task.request_str
                ));
            }
            Ok(body)
        }
        Command::Topology => {
            let snapshot = db.snapshot();
            let mut body = String::new();
            for dataset in &snapshot.datasets {
                body.push_str(&format!("DATASET {}\n", dataset.id()));
                for (kind_name, _) in &dataset.manifest().indexes {
                    body.push_str(&format!("INDEX {} {}\n", dataset.id(), kind_name));
                }
            }
            Ok(body)
        }
    }
}

#[cfg(test)]
#[path = "worker_test.rs"]
mod worker_test;
