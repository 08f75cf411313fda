#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::shared::{CompetitionId, DomainError};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap()
    }

    fn competition(title: &str, starts_in_h: Option<i64>, ends_in_h: i64) -> Competition {
        let window = CompetitionWindow::new(
            starts_in_h.map(|h| now() + Duration::hours(h)),
            now() + Duration::hours(ends_in_h),
        );
        let mut competition = Competition::new(CompetitionId::from_string(title), title, window);
        competition.ticket_cost = 3;
        competition
    }

    #[test]
    fn test_check_entry_open_with_enough_tickets() {
        let comp = competition("weekly", Some(-1), 5);
        assert!(comp.check_entry(3, now()).is_ok());
    }

    #[test]
    fn test_check_entry_rejects_upcoming_and_ended() {
        let upcoming = competition("future", Some(2), 5);
        let ended = competition("past", None, -1);

        assert!(matches!(
            upcoming.check_entry(10, now()),
            Err(DomainError::CompetitionClosed(_))
        ));
        assert!(matches!(
            ended.check_entry(10, now()),
            Err(DomainError::CompetitionClosed(_))
        ));
    }

    #[test]
    fn test_check_entry_rejects_short_ticket_balance() {
        let comp = competition("weekly", None, 5);
        let err = comp.check_entry(2, now()).unwrap_err();

        assert!(matches!(err, DomainError::InsufficientTickets(_)));
        assert!(err.message().contains("costs 3 tickets, 2 available"));
    }

    #[test]
    fn test_check_entry_rejects_repeat_entry() {
        let mut comp = competition("weekly", None, 5);
        comp.entered = true;

        assert!(matches!(
            comp.check_entry(10, now()),
            Err(DomainError::AlreadyEntered(_))
        ));
    }

    #[test]
    fn test_free_competition_needs_no_tickets() {
        let mut comp = competition("free", None, 5);
        comp.ticket_cost = 0;
        assert!(comp.check_entry(0, now()).is_ok());
    }

    #[test]
    fn test_sort_for_display_orders_by_phase_then_time() {
        let mut list = vec![
            competition("ended-old", Some(-100), -50),
            competition("upcoming-late", Some(48), 96),
            competition("open-late", None, 72),
            competition("ended-recent", Some(-10), -1),
            competition("upcoming-soon", Some(1), 96),
            competition("open-soon", Some(-5), 2),
        ];

        sort_for_display(&mut list, now());

        let titles: Vec<&str> = list.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "open-soon",
                "open-late",
                "upcoming-soon",
                "upcoming-late",
                "ended-recent",
                "ended-old",
            ]
        );
    }

    #[test]
    fn test_filter_matches_phase() {
        assert!(CompetitionFilter::All.matches(CompetitionPhase::Ended));
        assert!(CompetitionFilter::Open.matches(CompetitionPhase::Open));
        assert!(!CompetitionFilter::Open.matches(CompetitionPhase::Upcoming));
        assert!(CompetitionFilter::Ended.matches(CompetitionPhase::Ended));
    }

    #[test]
    fn test_filter_parses_case_insensitively() {
        assert_eq!("Open".parse::<CompetitionFilter>().unwrap(), CompetitionFilter::Open);
        assert_eq!(
            " upcoming ".parse::<CompetitionFilter>().unwrap(),
            CompetitionFilter::Upcoming
        );
        assert!("closed".parse::<CompetitionFilter>().is_err());
    }
}
