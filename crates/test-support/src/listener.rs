use engine::TransferListener;

/// One observed transfer event.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Event {
    DirectoryStarted(String),
    DirectoryFinished(String),
    FileStarted(String, u64),
    Progress(u64),
    FileFinished(String),
}

/// Listener that records every event it receives.
#[derive(Clone, Debug, Default)]
pub struct RecordingListener {
    events: Vec<Event>,
}

impl RecordingListener {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Cumulative progress values in the order they were reported.
    #[must_use]
    pub fn progress(&self) -> Vec<u64> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Progress(value) => Some(*value),
                _ => None,
            })
            .collect()
    }

    /// Events other than progress updates.
    #[must_use]
    pub fn milestones(&self) -> Vec<Event> {
        self.events
            .iter()
            .filter(|event| !matches!(event, Event::Progress(_)))
            .cloned()
            .collect()
    }
}

impl TransferListener for RecordingListener {
    fn directory_started(&mut self, name: &str) {
        self.events.push(Event::DirectoryStarted(name.to_owned()));
    }

    fn directory_finished(&mut self, name: &str) {
        self.events.push(Event::DirectoryFinished(name.to_owned()));
    }

    fn file_started(&mut self, name: &str, size: u64) {
        self.events.push(Event::FileStarted(name.to_owned(), size));
    }

    fn progress(&mut self, transferred: u64) {
        self.events.push(Event::Progress(transferred));
    }

    fn file_finished(&mut self, name: &str) {
        self.events.push(Event::FileFinished(name.to_owned()));
    }
}
