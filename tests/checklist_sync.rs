
use std::sync::Arc;
use std::time::Duration;

use college_ready::checklist::{ItemKey, ItemSync, ProgressTier};
use college_ready::client::Client;
use college_ready::college::SuggestionKind;
use college_ready::mock_behaviour::MockBehaviour;
use college_ready::note::NewNote;
use college_ready::session::{Session, User};
use college_ready::traits::ChecklistSource;
use college_ready::{ChecklistView, PlannerError, SuggestionBox};

const RICE: &str = "Rice University";
const DUKE: &str = "Duke University";


#[tokio::test]
async fn test_select_and_toggle() {
    let _ = env_logger::builder().is_test(true).try_init();

    let source = scenarii::populated_source();
    let mut view = ChecklistView::new(scenarii::USER_ID);

    assert!(view.select_college(&source, RICE).await.unwrap());
    println!("---- {} -----", RICE);
    college_ready::utils::print_checklist(view.checklist(), view.state());
    assert_eq!(view.state().len(), 4);
    assert_eq!(view.progress(), 25);
    assert_eq!(ProgressTier::from_progress(view.progress()), ProgressTier::InProgress);

    let key = ItemKey::new("applicationRequirements", 1);
    view.toggle(&source, &key, true).await.unwrap();
    assert_eq!(view.progress(), 50);
    assert_eq!(view.state().get(&key).unwrap().sync, ItemSync::Synced);

    // The server has it too
    let remote = source.checklist(scenarii::USER_ID, RICE).unwrap();
    assert_eq!(remote.item(&key).unwrap().completed, true);
}

#[tokio::test]
async fn test_failed_toggle_rolls_back() {
    let _ = env_logger::builder().is_test(true).try_init();

    let (source, _mock) = scenarii::mocked_source(MockBehaviour {
        update_checklist_item_behaviour: (0, 1),
        ..MockBehaviour::default()
    });
    let mut view = ChecklistView::new(scenarii::USER_ID);
    view.select_college(&source, RICE).await.unwrap();

    let key = ItemKey::new("applicationRequirements", 0);
    let result = view.toggle(&source, &key, false).await;
    assert!(matches!(result, Err(PlannerError::Server { .. })));

    let state = view.state().get(&key).unwrap();
    assert_eq!(state.completed, true);
    assert_eq!(state.sync, ItemSync::Synced);
    assert_eq!(view.progress(), 25);
    assert_eq!(source.checklist(scenarii::USER_ID, RICE).unwrap().item(&key).unwrap().completed, true);

    // The next attempt goes through
    view.toggle(&source, &key, false).await.unwrap();
    assert_eq!(view.progress(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_stale_load_is_discarded() {
    let _ = env_logger::builder().is_test(true).try_init();

    let source = scenarii::populated_source();
    source.delay_checklist(RICE, Duration::from_millis(500));
    let mut view = ChecklistView::new(scenarii::USER_ID);

    // The user picks Rice, then Duke before Rice has loaded
    let rice_ticket = view.begin_load(RICE);
    let duke_ticket = view.begin_load(DUKE);
    let (rice, duke) = tokio::join!(
        source.get_checklist(scenarii::USER_ID, RICE),
        source.get_checklist(scenarii::USER_ID, DUKE),
    );

    assert!(view.finish_load(duke_ticket, duke).unwrap());
    assert_eq!(view.finish_load(rice_ticket, rice).unwrap(), false);

    assert_eq!(view.college(), Some(DUKE));
    assert_eq!(view.state().len(), 1);
    assert_eq!(view.progress(), 100);
}

#[tokio::test]
async fn test_edit_and_save() {
    let _ = env_logger::builder().is_test(true).try_init();

    let (source, mock) = scenarii::mocked_source(MockBehaviour {
        replace_checklist_behaviour: (0, 1),
        ..MockBehaviour::default()
    });
    let mut view = ChecklistView::new(scenarii::USER_ID);
    view.select_college(&source, RICE).await.unwrap();

    let mut draft = view.edit();
    let new_key = draft.add_item("applicationRequirements").unwrap();
    draft.edit_text(&new_key, "Interview with an alumnus").unwrap();
    draft.delete_item(&ItemKey::new("applicationRequirements", 2)).unwrap();
    assert!(draft.edit_text(&ItemKey::new("deadlines", 0), "Whatever").is_err());

    // The server refuses the first time: nothing changes
    assert!(view.save_draft(&source, draft.clone()).await.is_err());
    assert_eq!(view.state().len(), 4);

    mock.lock().unwrap().suspend();
    view.save_draft(&source, draft).await.unwrap();
    assert_eq!(view.state().len(), 4);
    assert_eq!(view.checklist().item(&ItemKey::new("applicationRequirements", 2)).unwrap().label(), "Interview with an alumnus");
    assert_eq!(source.checklist(scenarii::USER_ID, RICE).unwrap(), *view.checklist());
}

#[tokio::test(start_paused = true)]
async fn test_debounced_suggestions() {
    let _ = env_logger::builder().is_test(true).try_init();

    let source = Arc::new(scenarii::populated_source());
    let mut suggestions = SuggestionBox::new(Arc::clone(&source), SuggestionKind::College);
    let mut receiver = suggestions.subscribe();

    for query in &["d", "du", "duk", "duke"] {
        suggestions.on_query(query);
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
    assert!(source.suggestion_calls().is_empty());
    // Short queries have cleared the list
    assert!(receiver.borrow_and_update().is_empty());

    receiver.changed().await.unwrap();
    assert_eq!(*receiver.borrow(), vec![DUKE.to_string()]);
    assert_eq!(source.suggestion_calls(), vec!["duke".to_string()]);
}

#[tokio::test]
async fn test_note_validation_before_any_request() {
    let _ = env_logger::builder().is_test(true).try_init();

    // Nothing listens there: any request would fail with a transport error
    let session = Session::signed_in(User::new(scenarii::USER_ID).with_id_token("token"));
    let client = Client::new("http://127.0.0.1:9", session).unwrap();

    let no_title = NewNote::from_form("  ", "Some content", "");
    assert!(matches!(no_title, Err(PlannerError::Validation(_))));

    let note = NewNote::from_form("Essay", &"x".repeat(2001), "").unwrap_err();
    assert_eq!(note.user_message(), "Note content cannot exceed 2000 characters.");

    match client.update_note(scenarii::USER_ID, "Essay", "").await {
        Err(PlannerError::Validation(message)) => assert_eq!(message, "Title and Content must be filled out"),
        other => panic!("Unexpected result {:?}", other),
    }
    match client.update_note(scenarii::USER_ID, "Essay", &"é".repeat(2001)).await {
        Err(PlannerError::Validation(_)) => (),
        other => panic!("Unexpected result {:?}", other),
    }
}
