use avtask_core::{Response, SessionSummary, SpreadsheetStore, Workbook};

use crate::error::ExperimentResult;

pub const SUMMARY_SHEET: &str = "summary";
pub const SUMMARY_HEADERS: [&str; 5] = [
    "Participant ID",
    "Avg Reaction Experimental",
    "Accuracy Experimental",
    "Avg Reaction Control",
    "Accuracy Control",
];
pub const TRIAL_HEADERS: [&str; 3] = ["Trial", "Reaction Time", "Accuracy"];

/// Writes one participant's rows into the shared results workbook
pub struct ResultsRecorder<S: SpreadsheetStore> {
    store: S,
    workbook: Workbook,
    participant_id: String,
}

impl<S: SpreadsheetStore> ResultsRecorder<S> {
    /// Loads or creates the workbook and opens a sheet for a new participant.
    ///
    /// The participant number is the row count of the summary sheet, header
    /// included, so the first participant is `<tag>1`.
    pub fn open(mut store: S, tag: &str) -> ExperimentResult<Self> {
        let mut workbook = store.load()?.unwrap_or_default();
        if !workbook.has_sheet(SUMMARY_SHEET) {
            workbook.add_sheet(SUMMARY_SHEET).append(&SUMMARY_HEADERS);
        }

        let participant_id = next_participant_id(&workbook, tag);
        workbook.add_sheet(&participant_id).append(&TRIAL_HEADERS);
        store.save(&workbook)?;

        println!("Participant {participant_id}");
        Ok(Self {
            store,
            workbook,
            participant_id,
        })
    }

    pub fn participant_id(&self) -> &str {
        &self.participant_id
    }

    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    /// Appends the trial row to the participant sheet and saves.
    pub fn record(&mut self, response: &Response) -> ExperimentResult<()> {
        let row = [
            response.trial.to_string(),
            format_seconds(response.reaction_time_s),
            response.answer_label().to_string(),
        ];
        self.workbook.add_sheet(&self.participant_id).append(&row);
        self.store.save(&self.workbook)?;
        Ok(())
    }

    /// Appends the participant's summary row and saves.
    pub fn finish(&mut self, summary: &SessionSummary) -> ExperimentResult<()> {
        let avg = format_seconds(summary.average_reaction_s);
        let accuracy = format!("{}/{}", summary.correct, summary.trials_completed);
        let row = [
            self.participant_id.clone(),
            avg.clone(),
            accuracy.clone(),
            avg,
            accuracy,
        ];
        self.workbook.add_sheet(SUMMARY_SHEET).append(&row);
        self.store.save(&self.workbook)?;
        Ok(())
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

/// `<tag><n>` where n counts summary rows, skipping names already taken by
/// sessions that quit before writing their summary.
fn next_participant_id(workbook: &Workbook, tag: &str) -> String {
    let mut n = workbook
        .sheet(SUMMARY_SHEET)
        .map_or(0, |sheet| sheet.rows.len());
    loop {
        let id = format!("{tag}{n}");
        if !workbook.has_sheet(&id) {
            return id;
        }
        n += 1;
    }
}

pub fn format_seconds(seconds: f64) -> String {
    format!("{seconds:.2}s")
}
