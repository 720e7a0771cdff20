mod content;
mod event;

use super::Database;

pub fn run_all_tests(db: &Database) {
    member::run_user_tests(db);
    member::run_member_tests(db);

    event::run_event_tests(db);

    permission::run_permission_tests(db);

    budget::run_metrics_tests(db);
    budget::run_budget_tests(db);

    content::run_folder_tests(db);
    content::run_announcement_tests(db);
}
