use crate::server::db::Database;
use crate::types::event::Event;

fn mock_event(title: &str, date: &str) -> Event {
    Event {
        id: 0,
        title: title.to_string(),
        date: date.to_string(),
        kind: String::from("meeting"),
        description: format!("About {title}"),
        create_time: 0,
    }
}

pub fn run_event_tests(db: &Database) {
    let events = [
        mock_event("Winter social", "2026-12-12"),
        mock_event("Board meeting", "2026-11-02"),
        mock_event("Fundraiser", "2027-01-20"),
    ];

    let mut created = vec![];
    db.with_transaction(|tx| {
        for event in events.iter() {
            created.push(tx.create_event(event.clone())?);
        }
        Ok(())
    })
    .unwrap();

    db.with_transaction(|tx| {
        for event in created.iter() {
            let got = tx.get_event(event.id).unwrap().unwrap();
            assert_eq!(&got, event);
        }

        let list = tx.list_events().unwrap();
        let titles: Vec<_> = list.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Board meeting", "Winter social", "Fundraiser"]);

        assert!(tx.delete_event(created[0].id).unwrap());
        assert!(tx.get_event(created[0].id).unwrap().is_none());
        assert!(!tx.delete_event(created[0].id).unwrap());
        assert!(!tx.delete_event(9999).unwrap());

        assert_eq!(tx.list_events().unwrap().len(), 2);
        Ok(())
    })
    .unwrap();
}
