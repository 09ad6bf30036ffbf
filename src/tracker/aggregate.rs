use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use super::entry::Entry;
use super::project::Project;

impl Project {
    /// Total tracked time for this project and its non-archived descendants.
    /// An open entry counts from its start to `now` no matter how old it is;
    /// closed entries count their stored duration when they started after
    /// `since`. Archived subtrees contribute nothing, whatever the window.
    pub fn duration_since(&self, since: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
        let mut total = Duration::zero();

        for entry in &self.entries {
            if entry.is_open() {
                total = total + (now - entry.start).max(Duration::zero());
            } else if entry.start > since {
                total = total + entry.duration;
            }
        }

        for child in &self.children {
            if !child.is_archived {
                total = total + child.duration_since(since, now);
            }
        }

        total
    }

    /// Entries of this project alone that started after `since`, in
    /// chronological order. Descendants are listed separately by the caller.
    pub fn entries_since(&self, since: DateTime<Utc>) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(move |e| e.start > since)
    }

    /// Recomputes the stored duration of every closed entry in the subtree.
    pub fn recalculate(&mut self) {
        for entry in &mut self.entries {
            entry.recalculate();
        }
        for child in &mut self.children {
            child.recalculate();
        }
    }
}
