use anyhow::Result;

/// One named sheet of string rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn append<S: AsRef<str>>(&mut self, row: &[S]) {
        self.rows
            .push(row.iter().map(|c| c.as_ref().to_string()).collect());
    }
}

/// In-memory copy of the results spreadsheet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sheets(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheet(name).is_some()
    }

    /// Returns the named sheet, appending an empty one if it does not exist.
    pub fn add_sheet(&mut self, name: &str) -> &mut Sheet {
        let index = match self.sheets.iter().position(|s| s.name == name) {
            Some(index) => index,
            None => {
                self.sheets.push(Sheet::new(name));
                self.sheets.len() - 1
            }
        };
        &mut self.sheets[index]
    }
}

/// Persistent home of a `Workbook`
pub trait SpreadsheetStore {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&mut self) -> Result<Option<Workbook>>;
    fn save(&mut self, workbook: &Workbook) -> Result<()>;
}

/// Store that keeps the last saved workbook in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub saved: Option<Workbook>,
    pub save_count: usize,
}

impl MemoryStore {
    pub fn with_workbook(workbook: Workbook) -> Self {
        Self {
            saved: Some(workbook),
            save_count: 0,
        }
    }
}

impl SpreadsheetStore for MemoryStore {
    fn load(&mut self) -> Result<Option<Workbook>> {
        Ok(self.saved.clone())
    }

    fn save(&mut self, workbook: &Workbook) -> Result<()> {
        self.saved = Some(workbook.clone());
        self.save_count += 1;
        Ok(())
    }
}
