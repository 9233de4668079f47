use super::project::CanonicalProject;
use core::cmp::Ordering;

/// Compare two projects for ranking: higher popularity first, then most recently updated first.
///
/// Projects without a timestamp sort as if updated at the epoch.
#[must_use]
pub fn compare(a: &CanonicalProject, b: &CanonicalProject) -> Ordering {
    b.popularity()
        .total_cmp(&a.popularity())
        .then_with(|| b.updated_millis().cmp(&a.updated_millis()))
}

/// Sort projects in ranking order.
///
/// The sort is stable, so projects that tie on both keys keep their incoming (first-seen) order.
pub fn rank(projects: &mut [CanonicalProject]) {
    projects.sort_by(compare);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn project(name: &str) -> CanonicalProject {
        CanonicalProject::new("Test", name, format!("https://example.com/{name}"))
    }

    fn names(projects: &[CanonicalProject]) -> Vec<&str> {
        projects.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_stars_then_downloads_proxy() {
        let mut a = project("a");
        a.stats.stars = Some(50);
        let mut b = project("b");
        b.stats.downloads = Some(10_000); // proxy 100
        let c = project("c"); // proxy 0
        let mut d = project("d");
        d.stats.stars = Some(101);

        let mut projects = vec![a, b, c, d];
        rank(&mut projects);
        assert_eq!(names(&projects), ["d", "b", "a", "c"]);
    }

    #[test]
    fn test_recency_breaks_ties() {
        let mut old = project("old");
        old.stats.stars = Some(10);
        old.updated_at = Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());

        let mut new = project("new");
        new.stats.stars = Some(10);
        new.updated_at = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());

        let mut unknown = project("unknown");
        unknown.stats.stars = Some(10);

        let mut projects = vec![unknown, old, new];
        rank(&mut projects);
        assert_eq!(names(&projects), ["new", "old", "unknown"]);
    }

    #[test]
    fn test_full_ties_keep_input_order() {
        let mut projects = vec![project("first"), project("second"), project("third")];
        rank(&mut projects);
        assert_eq!(names(&projects), ["first", "second", "third"]);
    }

    #[test]
    fn test_ranking_is_idempotent() {
        let mut a = project("a");
        a.stats.stars = Some(3);
        let mut b = project("b");
        b.stats.stars = Some(7);

        let mut once = vec![a, b, project("c")];
        rank(&mut once);
        let mut twice = once.clone();
        rank(&mut twice);
        assert_eq!(once, twice);
    }
}
