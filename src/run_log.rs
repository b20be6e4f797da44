use std::{fs::OpenOptions, io::BufWriter, path::Path};
use csv::WriterBuilder;
use tracing::debug;
use crate::{formulation::ModelType, solver::errors::KmstError};





pub const HEADER: [&str; 6] = ["Filename", "Model", "Nodes", "Cost", "B&B-Nodes", "CPUTime"];

// Placeholder for values a run could not provide.
const MISSING: &str = "-";



/// One row of the run log. `nodes` is the requested k, `cost` is `None` for infeasible runs.
#[derive(Clone, Debug, PartialEq)]
pub struct RunRecord {
    pub filename: String,
    pub model: ModelType,
    pub nodes: usize,
    pub cost: Option<f64>,
    pub bb_nodes: Option<u64>,
    pub cpu_time: f64,
}

// RunRecord::RunRecord
impl RunRecord {
    fn fields(&self) -> [String; 6] {
        [
            self.filename.clone(),
            self.model.to_string(),
            self.nodes.to_string(),
            self.cost.map(|x| x.to_string()).unwrap_or_else(|| MISSING.to_string()),
            self.bb_nodes.map(|x| x.to_string()).unwrap_or_else(|| MISSING.to_string()),
            format!("{:.6}", self.cpu_time),
        ]
    }
}



/// Appends `record` to the tab-separated log at `path`, writing the header first if the file is new.
pub fn append(path: impl AsRef<Path>, record: &RunRecord) -> Result<(), KmstError> {
    let path: &Path = path.as_ref();
    let file_exists: bool = path.exists();
    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let mut writer = WriterBuilder::new().delimiter(b'\t').has_headers(false).from_writer(BufWriter::new(file));
    if !file_exists {
        writer.write_record(HEADER)?;
    }
    writer.write_record(record.fields())?;
    writer.flush()?;
    debug!("Appended run of {} to {}", record.model, path.display());
    Ok(())
}



#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn record(cost: Option<f64>) -> RunRecord {
        RunRecord { filename: "data/g01.dat".to_string(), model: ModelType::Mtz, nodes: 5, cost, bb_nodes: None, cpu_time: 0.25 }
    }

    #[test]
    fn header_is_written_once() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("log.txt");
        append(&path, &record(Some(46.0))).unwrap();
        append(&path, &record(None)).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines, vec![
            "Filename\tModel\tNodes\tCost\tB&B-Nodes\tCPUTime",
            "data/g01.dat\tmtz\t5\t46\t-\t0.250000",
            "data/g01.dat\tmtz\t5\t-\t-\t0.250000",
        ]);
    }

    #[test]
    fn existing_files_are_appended_to() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("log.txt");
        fs::write(&path, "earlier\n").unwrap();
        append(&path, &RunRecord { bb_nodes: Some(12), ..record(Some(3.5)) }).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "earlier\ndata/g01.dat\tmtz\t5\t3.5\t12\t0.250000\n");
    }

    #[test]
    fn unwritable_paths_fail() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("missing").join("log.txt");
        assert!(matches!(append(&path, &record(None)), Err(KmstError::Io(_))));
    }
}
