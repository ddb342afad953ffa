//! Sort/search state of the process table.

use std::cmp::Ordering;

use super::display::TableData;
use super::metrics::ProcessRecord;

const ASCENDING_GLYPH: &str = "▲";
const DESCENDING_GLYPH: &str = "▼";

/// Column the process table is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Pid,
    #[default]
    Cpu,
    Mem,
}

impl SortKey {
    /// Index of the header this key annotates.
    fn column(&self) -> usize {
        match self {
            SortKey::Pid => 0,
            SortKey::Cpu => 2,
            SortKey::Mem => 3,
        }
    }

    fn compare(&self, a: &ProcessRecord, b: &ProcessRecord) -> Ordering {
        match self {
            SortKey::Pid => a.pid.cmp(&b.pid),
            SortKey::Cpu => a.cpu.total_cmp(&b.cpu),
            SortKey::Mem => a.mem.total_cmp(&b.mem),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessTableState {
    sort_key: SortKey,
    reversed: bool,
    search_term: String,
    reindex: bool,
}

impl ProcessTableState {
    /// Start sorted by CPU, descending, with an optional initial filter.
    pub fn new(initial_search: &str) -> Self {
        Self {
            search_term: initial_search.trim().to_lowercase(),
            ..Self::default()
        }
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Same key toggles direction; a new key keeps the current direction.
    pub fn press_sort(&mut self, key: SortKey) {
        if key == self.sort_key {
            self.reversed = !self.reversed;
        } else {
            self.sort_key = key;
        }
        self.reindex = true;
    }

    /// Store a confirmed search. Returns `false` (and changes nothing) for
    /// blank input.
    pub fn submit_search(&mut self, input: &str) -> bool {
        let term = input.trim();
        if term.is_empty() {
            return false;
        }
        self.search_term = term.to_lowercase();
        self.reindex = true;
        true
    }

    /// Drop the active search. Returns `false` when there was none, so the
    /// caller can let the key fall through.
    pub fn clear_search(&mut self) -> bool {
        if self.search_term.is_empty() {
            return false;
        }
        self.search_term.clear();
        self.reindex = true;
        true
    }

    /// Read and clear the reindex flag.
    pub fn take_reindex(&mut self) -> bool {
        std::mem::take(&mut self.reindex)
    }

    pub fn matches(&self, process: &ProcessRecord) -> bool {
        if self.search_term.is_empty() {
            return true;
        }
        process.command.to_lowercase().contains(&self.search_term)
            || process.pid.to_string().contains(&self.search_term)
    }

    /// Filter, sort and format `processes` for display.
    ///
    /// Rows are sorted descending by the active key with a stable sort, so
    /// equal values keep provider order; reversed mode flips the whole
    /// sorted view.
    pub fn build_view(&self, processes: &[ProcessRecord]) -> TableData {
        let mut view: Vec<&ProcessRecord> = processes.iter().filter(|p| self.matches(p)).collect();
        view.sort_by(|a, b| self.sort_key.compare(b, a));
        if self.reversed {
            view.reverse();
        }

        let rows = view
            .into_iter()
            .map(|p| {
                vec![
                    p.pid.to_string(),
                    p.command.clone(),
                    format!("{:.1}", p.cpu),
                    format!("{:.1}", p.mem),
                ]
            })
            .collect();

        TableData {
            headers: self.headers(),
            rows,
        }
    }

    fn headers(&self) -> Vec<String> {
        let mut headers: Vec<String> = ["PID", "Command", "%CPU", "%MEM"]
            .iter()
            .map(|h| h.to_string())
            .collect();

        if !self.search_term.is_empty() {
            headers[1] = format!("Command (/{})", self.search_term);
        }

        let glyph = if self.reversed {
            ASCENDING_GLYPH
        } else {
            DESCENDING_GLYPH
        };
        headers[self.sort_key.column()].push_str(glyph);

        headers
    }
}
