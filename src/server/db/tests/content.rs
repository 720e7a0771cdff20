use crate::server::db::Database;
use crate::types::announcement::Announcement;
use crate::types::file::FileInfo;
use crate::types::folder::{Folder, DEFAULT_FOLDER_COLOR};

fn mock_folder(name: &str, parent_id: Option<u64>) -> Folder {
    Folder {
        id: 0,
        name: name.to_string(),
        color: String::from(DEFAULT_FOLDER_COLOR),
        parent_id,
        created_by: String::from("Cara"),
        create_time: 0,
    }
}

fn mock_file(name: &str, folder_id: Option<u64>) -> FileInfo {
    FileInfo {
        id: 0,
        filename: format!("stored-{name}"),
        original_name: name.to_string(),
        file_size: 1024,
        mime_type: String::from("application/pdf"),
        uploaded_by: String::from("Cara"),
        file_path: format!("uploads/stored-{name}"),
        folder_id,
        upload_time: 0,
    }
}

pub fn run_folder_tests(db: &Database) {
    let (minutes, drafts, agenda, loose) = db
        .with_transaction(|tx| {
            let minutes = tx.create_folder(mock_folder("Minutes", None))?;
            let drafts = tx.create_folder(mock_folder("Drafts", Some(minutes.id)))?;
            let agenda = tx.create_file(mock_file("agenda.pdf", Some(minutes.id)))?;
            let loose = tx.create_file(mock_file("loose.pdf", None))?;
            Ok((minutes, drafts, agenda, loose))
        })
        .unwrap();

    db.with_transaction(|tx| {
        let got = tx.get_folder(minutes.id).unwrap().unwrap();
        assert_eq!(got, minutes);

        let mut renamed = got.clone();
        renamed.name = String::from("Board minutes");
        renamed.color = String::from("#10B981");
        tx.update_folder(&renamed).unwrap();
        assert_eq!(tx.get_folder(minutes.id).unwrap().unwrap(), renamed);

        let names: Vec<_> = tx
            .list_folders()
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["Board minutes", "Drafts"]);

        assert!(tx.move_file(loose.id, Some(drafts.id)).unwrap());
        assert!(!tx.move_file(9999, None).unwrap());
        Ok(())
    })
    .unwrap();

    db.with_transaction(|tx| {
        assert!(tx.delete_folder(minutes.id).unwrap());
        assert!(!tx.delete_folder(minutes.id).unwrap());
        assert!(tx.get_folder(minutes.id).unwrap().is_none());

        // Contents of a deleted folder move to the root
        let agenda = tx.get_file(agenda.id).unwrap().unwrap();
        assert_eq!(agenda.folder_id, None);
        let drafts = tx.get_folder(drafts.id).unwrap().unwrap();
        assert_eq!(drafts.parent_id, None);

        let loose = tx.get_file(loose.id).unwrap().unwrap();
        assert_eq!(loose.folder_id, Some(drafts.id));

        assert_eq!(tx.list_files().unwrap().len(), 2);
        assert!(tx.delete_file(loose.id).unwrap());
        assert!(!tx.delete_file(loose.id).unwrap());
        assert!(tx.get_file(loose.id).unwrap().is_none());
        Ok(())
    })
    .unwrap();
}

pub fn run_announcement_tests(db: &Database) {
    let created = db
        .with_transaction(|tx| {
            let mut created = vec![];
            for title in ["First", "Second", "Third"] {
                created.push(tx.create_announcement(Announcement {
                    id: 0,
                    title: title.to_string(),
                    content: format!("{title} body"),
                    author: String::from("Cara"),
                    priority: String::from("normal"),
                    create_time: 0,
                })?);
            }
            Ok(created)
        })
        .unwrap();

    db.with_transaction(|tx| {
        let titles: Vec<_> = tx
            .list_announcements()
            .unwrap()
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(titles, vec!["Third", "Second", "First"]);

        assert!(tx.delete_announcement(created[1].id).unwrap());
        assert!(!tx.delete_announcement(created[1].id).unwrap());
        assert_eq!(tx.list_announcements().unwrap().len(), 2);
        Ok(())
    })
    .unwrap();
}
