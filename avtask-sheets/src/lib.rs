//! xlsx persistence for the results workbook.
//!
//! Reading goes through calamine and writing through rust_xlsxwriter; every
//! save rewrites the whole file from the in-memory workbook.

use std::path::PathBuf;

use anyhow::{Context, Result};
use avtask_core::{Sheet, SpreadsheetStore, Workbook};
use calamine::{Reader, Xlsx, open_workbook};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};

pub struct XlsxStore {
    path: PathBuf,
}

impl XlsxStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SpreadsheetStore for XlsxStore {
    fn load(&mut self) -> Result<Option<Workbook>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let mut xlsx: Xlsx<_> = open_workbook(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;

        let mut sheets = Vec::new();
        for name in xlsx.sheet_names() {
            let range = xlsx
                .worksheet_range(&name)
                .with_context(|| format!("reading sheet {name} of {}", self.path.display()))?;
            let rows = range
                .rows()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect();
            sheets.push(Sheet { name, rows });
        }
        Ok(Some(Workbook::from_sheets(sheets)))
    }

    fn save(&mut self, workbook: &Workbook) -> Result<()> {
        let mut book = XlsxWorkbook::new();
        let header = Format::new().set_bold();

        for sheet in workbook.sheets() {
            let ws = book.add_worksheet();
            ws.set_name(&sheet.name)?;
            for (r, row) in sheet.rows.iter().enumerate() {
                for (c, cell) in row.iter().enumerate() {
                    if r == 0 {
                        ws.write_string_with_format(r as u32, c as u16, cell, &header)?;
                    } else {
                        ws.write_string(r as u32, c as u16, cell)?;
                    }
                }
            }
        }

        book.save(&self.path)
            .with_context(|| format!("saving {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = XlsxStore::new(dir.path().join("results.xlsx"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn saved_sheets_come_back_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = XlsxStore::new(dir.path().join("results_4_option.xlsx"));

        let mut wb = Workbook::new();
        let summary = wb.add_sheet("summary");
        summary.append(&["Participant ID", "Avg Reaction Experimental"]);
        summary.append(&["TAG1", "0.51s"]);
        let trials = wb.add_sheet("TAG1");
        trials.append(&["Trial", "Reaction Time", "Accuracy"]);
        trials.append(&["animals/cat", "0.51s", "correct"]);
        store.save(&wb).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, wb);
    }

    #[test]
    fn appending_after_reload_keeps_earlier_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.xlsx");

        let mut wb = Workbook::new();
        wb.add_sheet("summary").append(&["Participant ID"]);
        XlsxStore::new(&path).save(&wb).unwrap();

        let mut store = XlsxStore::new(&path);
        let mut reloaded = store.load().unwrap().unwrap();
        reloaded.add_sheet("summary").append(&["TAG1"]);
        store.save(&reloaded).unwrap();

        let loaded = store.load().unwrap().unwrap();
        let rows = &loaded.sheets()[0].rows;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["TAG1".to_string()]);
    }
}
