use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use super::entry::Entry;
use super::error::Error;
use super::project::Project;

/// What a toggle ended up doing, so the boundary can report it.
#[derive(Debug, PartialEq, Eq)]
pub enum SessionChange {
    Started(DateTime<Utc>),
    Stopped(Duration),
}

impl Project {
    /// Starts tracking this project. Does not start its children.
    pub fn start(&mut self, now: DateTime<Utc>, note: Option<String>) -> Result<DateTime<Utc>, Error> {
        if self.is_running {
            return Err(Error::AlreadyRunning(self.name.clone()));
        }

        self.entries.push(Entry::open(now, note));
        self.is_running = true;
        Ok(now)
    }

    /// Stops tracking this project, closing its open entry. Does not stop
    /// its children.
    pub fn stop(&mut self, now: DateTime<Utc>, note: Option<String>) -> Result<Duration, Error> {
        if !self.is_running {
            return Err(Error::NotRunning(self.name.clone()));
        }

        let entry = self
            .entries
            .last_mut()
            .ok_or_else(|| Error::NotRunning(self.name.clone()))?;
        entry.close(now, note);
        self.is_running = false;
        Ok(entry.duration)
    }

    pub fn toggle(&mut self, now: DateTime<Utc>, note: Option<String>) -> Result<SessionChange, Error> {
        if self.is_running {
            self.stop(now, note).map(SessionChange::Stopped)
        } else {
            self.start(now, note).map(SessionChange::Started)
        }
    }

    /// Hides this project and everything below it. A running project is
    /// stopped first, including running descendants. Never fails.
    pub fn archive(&mut self, now: DateTime<Utc>) {
        if self.is_running {
            self.stop(now, None).ok();
        }

        self.is_archived = true;

        for child in &mut self.children {
            child.archive(now);
        }
    }

    /// Brings this project back out of the archive. Descendants stay
    /// archived until recovered themselves.
    pub fn recover(&mut self) {
        self.is_archived = false;
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::tracker::error::Error;
    use crate::tracker::project::Project;

    use super::SessionChange;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_start_twice_fails() {
        let mut project = Project::named("cs193");

        project.start(at(9, 0), None).unwrap();
        let err = project.start(at(9, 5), None).unwrap_err();

        assert_eq!(err, Error::AlreadyRunning("cs193".to_string()));
        assert_eq!(project.entries.len(), 1);
        assert!(project.entries[0].is_open());
    }

    #[test]
    fn test_stop_twice_fails() {
        let mut project = Project::named("cs193");

        project.start(at(9, 0), None).unwrap();
        project.stop(at(10, 0), None).unwrap();
        let err = project.stop(at(10, 5), None).unwrap_err();

        assert_eq!(err, Error::NotRunning("cs193".to_string()));
    }

    #[test]
    fn test_stop_closes_entry_with_duration() {
        let mut project = Project::named("cs193");

        project.start(at(9, 0), Some("lecture".into())).unwrap();
        let duration = project.stop(at(10, 30), Some("done".into())).unwrap();

        assert_eq!(duration, Duration::minutes(90));
        assert!(!project.is_running);

        let entry = &project.entries[0];
        assert_eq!(entry.end, Some(at(10, 30)));
        assert_eq!(entry.duration, Duration::minutes(90));
        assert_eq!(entry.start_note, "lecture");
        assert_eq!(entry.end_note, "done");
    }

    #[test]
    fn test_toggle_alternates() {
        let mut project = Project::named("cs193");

        assert_eq!(
            project.toggle(at(9, 0), None).unwrap(),
            SessionChange::Started(at(9, 0))
        );
        assert_eq!(
            project.toggle(at(9, 45), None).unwrap(),
            SessionChange::Stopped(Duration::minutes(45))
        );
    }

    #[test]
    fn test_archive_stops_and_archives_whole_subtree() {
        let mut root = Project::default();
        root.insert("school").unwrap();
        root.insert("school/cs193").unwrap();
        root.node_mut("school/cs193").unwrap().start(at(9, 0), None).unwrap();

        root.node_mut("school").unwrap().archive(at(11, 0));

        let school = root.node_mut("school").unwrap();
        assert!(school.is_archived);
        assert!(!school.is_running);

        let cs193 = root.node_mut("school/cs193").unwrap();
        assert!(cs193.is_archived);
        assert!(!cs193.is_running);
        assert_eq!(cs193.entries[0].end, Some(at(11, 0)));
        assert_eq!(cs193.entries[0].duration, Duration::hours(2));
    }

    #[test]
    fn test_recover_is_not_recursive() {
        let mut root = Project::default();
        root.insert("school").unwrap();
        root.insert("school/cs193").unwrap();
        root.node_mut("school").unwrap().archive(at(9, 0));

        root.node_mut("school").unwrap().recover();

        assert!(!root.node_mut("school").unwrap().is_archived);
        assert!(root.node_mut("school/cs193").unwrap().is_archived);
    }
}
