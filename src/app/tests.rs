use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Terminal;
use ratatui::backend::TestBackend;

use crate::document::{LanguageGroup, LanguageOrdering, LinkTarget, Sense, WordEntry};
use crate::lookup::{LookupError, RawLookupResult, RawRecord, RawSense};
use crate::ui::DOCUMENT_LEFT_PADDING;

use super::event_loop::ResizeDebouncer;
use super::{App, Message, Model, ToastLevel, update};

fn record(language: &str, definition: &str) -> RawRecord {
    RawRecord {
        language: Some(language.to_string()),
        part_of_speech: Some("Noun".to_string()),
        gender: None,
        definitions: vec![RawSense {
            definition: definition.to_string(),
            examples: Vec::new(),
        }],
    }
}

fn dictionary(word: &str) -> Result<RawLookupResult, LookupError> {
    match word {
        "chat" => Ok(vec![
            record("French", r#"a <a rel="mw:WikiLink" title="cat">cat</a>"#),
            record("English", "idle talk"),
        ]
        .into()),
        "cat" => Ok(vec![record(
            "English",
            r#"a small <a title="feline">feline</a>; see <a class="mw-selflink selflink">cat</a>"#,
        )]
        .into()),
        "feline" => Ok(vec![record("English", "of cats")].into()),
        _ => Err(LookupError::Status {
            word: word.to_string(),
            status: 404,
        }),
    }
}

fn create_test_app() -> App {
    App::new(Box::new(dictionary))
}

/// An app whose source counts how often it is asked.
fn counting_app() -> (App, Rc<Cell<usize>>) {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let app = App::new(Box::new(move |word: &str| {
        counter.set(counter.get() + 1);
        dictionary(word)
    }));
    (app, calls)
}

fn model_for(app: &App, word: &str) -> Model {
    let entry = app.lookup(word).unwrap();
    app.initial_model((80, 24), Some(entry))
}

fn create_long_test_model() -> Model {
    let senses = (1..=40)
        .map(|i| Sense {
            part_of_speech: "Noun".to_string(),
            gender: None,
            definition: format!("meaning number {i}"),
            examples: Vec::new(),
        })
        .collect();
    let mut model = Model::new((80, 24));
    model.history.load(WordEntry {
        word: "set".to_string(),
        groups: vec![LanguageGroup {
            language: "English".to_string(),
            senses,
        }],
    });
    model.show_current();
    model
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

fn toast_text(model: &Model) -> Option<String> {
    model.active_toast().map(|(message, _)| message.to_string())
}

#[test]
fn test_scroll_down_updates_viewport() {
    let model = create_long_test_model();
    let model = update(model, Message::ScrollDown(5));
    assert_eq!(model.viewport.offset(), 5);
}

#[test]
fn test_scroll_up_updates_viewport() {
    let mut model = create_long_test_model();
    model.viewport.scroll_down(10);
    let model = update(model, Message::ScrollUp(3));
    assert_eq!(model.viewport.offset(), 7);
}

#[test]
fn test_go_to_bottom_then_top() {
    let model = create_long_test_model();
    let model = update(model, Message::GoToBottom);
    assert!(!model.viewport.can_scroll_down());
    let model = update(model, Message::GoToTop);
    assert_eq!(model.viewport.offset(), 0);
}

#[test]
fn test_scroll_keys_only_fire_when_scrollable() {
    let app = create_test_app();
    let model = model_for(&app, "feline");
    assert_eq!(app.handle_key(key(KeyCode::Char('j')), &model), None);

    let model = create_long_test_model();
    assert_eq!(
        app.handle_key(key(KeyCode::Char('j')), &model),
        Some(Message::ScrollDown(1))
    );
    assert_eq!(
        app.handle_key(key(KeyCode::Char(' ')), &model),
        Some(Message::PageDown)
    );
    assert_eq!(
        app.handle_key(
            KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL),
            &model
        ),
        Some(Message::HalfPageDown)
    );
}

#[test]
fn test_initial_model_shows_entry() {
    let app = create_test_app();
    let model = model_for(&app, "chat");
    assert_eq!(model.current_word(), Some("chat"));
    assert!(model.document.line_count() > 0);
    assert!(!model.prompt_active());
}

#[test]
fn test_initial_model_without_word_opens_prompt() {
    let app = create_test_app();
    let model = app.initial_model((80, 24), None);
    assert_eq!(model.prompt.as_deref(), Some(""));
    assert_eq!(model.current_word(), None);
}

#[test]
fn test_initial_model_keeps_config_paths() {
    let app = create_test_app().with_config_paths(
        Some(PathBuf::from("/tmp/global")),
        Some(PathBuf::from("/tmp/local")),
    );
    let model = app.initial_model((80, 24), None);
    assert_eq!(model.config_global_path, Some(PathBuf::from("/tmp/global")));
    assert_eq!(model.config_local_path, Some(PathBuf::from("/tmp/local")));
}

#[test]
fn test_lookup_applies_ordering() {
    let app = create_test_app().with_ordering(LanguageOrdering::new(
        vec!["English".to_string()],
        true,
    ));
    let entry = app.lookup("chat").unwrap();
    let languages: Vec<_> = entry.groups.iter().map(|g| g.language.as_str()).collect();
    assert_eq!(languages, vec!["English", "French"]);
}

#[test]
fn test_click_on_link_follows_it() {
    let app = create_test_app();
    let mut model = model_for(&app, "chat");
    let link = model.document.links()[0].clone();
    let column = DOCUMENT_LEFT_PADDING + u16::try_from(link.columns.start).unwrap();
    let row = u16::try_from(link.line).unwrap();

    let msg = app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), column, row), &model);
    assert_eq!(msg, Some(Message::FollowLinkAt(link.line, link.columns.start)));

    app.dispatch(&mut model, msg.unwrap());
    assert_eq!(model.current_word(), Some("cat"));
    assert_eq!(model.history.back_len(), 1);
    assert_eq!(model.viewport.offset(), 0);
}

#[test]
fn test_click_outside_link_does_nothing() {
    let app = create_test_app();
    let model = model_for(&app, "chat");
    let msg = app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 0, 0), &model);
    assert_eq!(msg, None);
}

#[test]
fn test_hover_emits_only_on_change() {
    let app = create_test_app();
    let mut model = model_for(&app, "chat");
    let link = model.document.links()[0].clone();
    let column = DOCUMENT_LEFT_PADDING + u16::try_from(link.columns.start).unwrap();
    let row = u16::try_from(link.line).unwrap();

    let msg = app.handle_mouse(mouse(MouseEventKind::Moved, column, row), &model);
    assert_eq!(
        msg,
        Some(Message::HoverLink(Some(LinkTarget::Word("cat".to_string()))))
    );
    model = update(model, msg.unwrap());
    assert_eq!(
        app.handle_mouse(mouse(MouseEventKind::Moved, column, row), &model),
        None
    );
    assert_eq!(
        app.handle_mouse(mouse(MouseEventKind::Moved, 0, 0), &model),
        Some(Message::HoverLink(None))
    );
}

#[test]
fn test_back_and_forward_restore_entries() {
    let app = create_test_app();
    let mut model = model_for(&app, "chat");
    app.dispatch(&mut model, Message::SubmitLookup("cat".to_string()));
    assert_eq!(model.current_word(), Some("cat"));

    app.dispatch(&mut model, Message::Back);
    assert_eq!(model.current_word(), Some("chat"));
    assert_eq!(model.history.forward_len(), 1);

    app.dispatch(&mut model, Message::Forward);
    assert_eq!(model.current_word(), Some("cat"));
    assert_eq!(model.history.forward_len(), 0);
}

#[test]
fn test_history_steps_never_call_source() {
    let (app, calls) = counting_app();
    let mut model = model_for(&app, "chat");
    app.dispatch(&mut model, Message::SubmitLookup("cat".to_string()));
    assert_eq!(calls.get(), 2);

    app.dispatch(&mut model, Message::Back);
    app.dispatch(&mut model, Message::Forward);
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_back_with_empty_history_shows_toast() {
    let app = create_test_app();
    let mut model = model_for(&app, "chat");
    app.dispatch(&mut model, Message::Back);
    assert_eq!(model.current_word(), Some("chat"));
    assert_eq!(toast_text(&model).as_deref(), Some("no back history"));
    assert_eq!(model.active_toast().map(|(_, level)| level), Some(ToastLevel::Info));
}

#[test]
fn test_following_clears_forward_history() {
    let app = create_test_app();
    let mut model = model_for(&app, "chat");
    app.dispatch(&mut model, Message::SubmitLookup("cat".to_string()));
    app.dispatch(&mut model, Message::Back);
    assert_eq!(model.history.forward_len(), 1);

    app.dispatch(&mut model, Message::SubmitLookup("feline".to_string()));
    assert_eq!(model.history.forward_len(), 0);
    assert_eq!(model.history.back_len(), 1);
}

#[test]
fn test_failed_lookup_keeps_current_entry() {
    let app = create_test_app();
    let mut model = model_for(&app, "chat");
    model.viewport.scroll_down(1);
    let offset = model.viewport.offset();

    app.dispatch(&mut model, Message::SubmitLookup("qwzx".to_string()));
    assert_eq!(model.current_word(), Some("chat"));
    assert_eq!(model.history.back_len(), 0);
    assert_eq!(model.viewport.offset(), offset);
    let (message, level) = model.active_toast().unwrap();
    assert_eq!(level, ToastLevel::Error);
    assert!(message.contains("qwzx"), "toast was {message:?}");
}

#[test]
fn test_self_link_does_not_call_source() {
    let (app, calls) = counting_app();
    let mut model = model_for(&app, "cat");
    assert_eq!(calls.get(), 1);

    let self_link = model
        .document
        .links()
        .iter()
        .position(|link| link.target == LinkTarget::CurrentPage)
        .unwrap();
    model.focused_link = Some(self_link);
    app.dispatch(&mut model, Message::FollowFocusedLink);

    assert_eq!(calls.get(), 1);
    assert_eq!(model.current_word(), Some("cat"));
    assert_eq!(model.history.back_len(), 1);
    assert_eq!(toast_text(&model).as_deref(), Some("Already showing \"cat\""));
}

#[test]
fn test_tab_cycles_visible_links() {
    let app = create_test_app();
    let model = model_for(&app, "cat");
    assert_eq!(
        app.handle_key(key(KeyCode::Tab), &model),
        Some(Message::NextLink)
    );

    let model = update(model, Message::NextLink);
    assert_eq!(model.focused_link, Some(0));
    assert_eq!(
        model.hovered_link,
        Some(LinkTarget::Word("feline".to_string()))
    );
    let model = update(model, Message::NextLink);
    assert_eq!(model.focused_link, Some(1));
    let model = update(model, Message::NextLink);
    assert_eq!(model.focused_link, Some(0));
    let model = update(model, Message::PrevLink);
    assert_eq!(model.focused_link, Some(1));
}

#[test]
fn test_enter_follows_focused_link() {
    let app = create_test_app();
    let mut model = model_for(&app, "cat");
    assert_eq!(app.handle_key(key(KeyCode::Enter), &model), None);

    model = update(model, Message::NextLink);
    let msg = app.handle_key(key(KeyCode::Enter), &model);
    assert_eq!(msg, Some(Message::FollowFocusedLink));
    app.dispatch(&mut model, msg.unwrap());
    assert_eq!(model.current_word(), Some("feline"));
    assert_eq!(model.focused_link, None);
}

#[test]
fn test_focus_dropped_when_link_scrolls_away() {
    let app = create_test_app();
    let mut model = model_for(&app, "cat");
    let link_line = model.document.links()[0].line;
    model.viewport.resize(80, 2);
    model.viewport.ensure_visible(link_line);
    model = update(model, Message::NextLink);
    assert_eq!(model.focused_link, Some(0));

    model = update(model, Message::GoToTop);
    assert!(!model.viewport.visible_range().contains(&link_line));
    assert_eq!(model.focused_link, None);
}

#[test]
fn test_open_visible_links_with_many_shows_picker() {
    let app = create_test_app();
    let mut model = model_for(&app, "cat");
    app.dispatch(&mut model, Message::OpenVisibleLinks);
    assert_eq!(model.link_picker_items.len(), 2);
    assert!(toast_text(&model).unwrap().starts_with("Select link"));

    let msg = app.handle_key(key(KeyCode::Char('1')), &model);
    assert_eq!(msg, Some(Message::SelectVisibleLink(1)));
    app.dispatch(&mut model, msg.unwrap());
    assert_eq!(model.current_word(), Some("feline"));
    assert!(!model.link_picker_active());
}

#[test]
fn test_open_visible_links_with_one_follows_directly() {
    let app = create_test_app();
    let mut model = model_for(&app, "chat");
    app.dispatch(&mut model, Message::OpenVisibleLinks);
    assert_eq!(model.current_word(), Some("cat"));
}

#[test]
fn test_open_visible_links_with_none_shows_toast() {
    let app = create_test_app();
    let mut model = model_for(&app, "feline");
    app.dispatch(&mut model, Message::OpenVisibleLinks);
    assert_eq!(toast_text(&model).as_deref(), Some("No visible links"));
    assert_eq!(model.current_word(), Some("feline"));
}

#[test]
fn test_picker_cancels_on_other_key() {
    let app = create_test_app();
    let mut model = model_for(&app, "cat");
    app.dispatch(&mut model, Message::OpenVisibleLinks);
    let msg = app.handle_key(key(KeyCode::Esc), &model);
    assert_eq!(msg, Some(Message::CancelVisibleLinkPicker));
    app.dispatch(&mut model, msg.unwrap());
    assert!(!model.link_picker_active());
    assert_eq!(model.current_word(), Some("cat"));
}

#[test]
fn test_picker_click_outside_cancels() {
    let app = create_test_app();
    let mut model = model_for(&app, "cat");
    app.dispatch(&mut model, Message::OpenVisibleLinks);
    let msg = app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 0, 0), &model);
    assert_eq!(msg, Some(Message::CancelVisibleLinkPicker));
}

#[test]
fn test_prompt_typing_and_submit() {
    let app = create_test_app();
    let mut model = model_for(&app, "chat");
    let msg = app.handle_key(key(KeyCode::Char('/')), &model);
    assert_eq!(msg, Some(Message::StartLookup));
    app.dispatch(&mut model, msg.unwrap());

    for c in ['c', 'a', 't', 'x'] {
        let msg = app.handle_key(key(KeyCode::Char(c)), &model).unwrap();
        app.dispatch(&mut model, msg);
    }
    let msg = app.handle_key(key(KeyCode::Backspace), &model).unwrap();
    app.dispatch(&mut model, msg);
    assert_eq!(model.prompt.as_deref(), Some("cat"));

    // Keys that normally navigate are text while the prompt is open.
    assert_eq!(
        app.handle_key(key(KeyCode::Char('q')), &model),
        Some(Message::LookupInput("catq".to_string()))
    );

    let msg = app.handle_key(key(KeyCode::Enter), &model);
    assert_eq!(msg, Some(Message::SubmitLookup("cat".to_string())));
    app.dispatch(&mut model, msg.unwrap());
    assert!(!model.prompt_active());
    assert_eq!(model.current_word(), Some("cat"));
}

#[test]
fn test_prompt_escape_cancels() {
    let app = create_test_app();
    let mut model = model_for(&app, "chat");
    app.dispatch(&mut model, Message::StartLookup);
    let msg = app.handle_key(key(KeyCode::Esc), &model);
    assert_eq!(msg, Some(Message::CancelLookup));
    app.dispatch(&mut model, msg.unwrap());
    assert!(!model.prompt_active());
    assert_eq!(model.current_word(), Some("chat"));
}

#[test]
fn test_blank_submit_does_nothing() {
    let (app, calls) = counting_app();
    let mut model = model_for(&app, "chat");
    app.dispatch(&mut model, Message::SubmitLookup("   ".to_string()));
    assert_eq!(calls.get(), 1);
    assert_eq!(model.history.back_len(), 0);
}

#[test]
fn test_help_toggles_and_any_key_closes() {
    let app = create_test_app();
    let model = model_for(&app, "chat");
    let msg = app.handle_key(key(KeyCode::Char('?')), &model);
    assert_eq!(msg, Some(Message::ToggleHelp));
    let model = update(model, msg.unwrap());
    assert!(model.help_visible);

    let msg = app.handle_key(key(KeyCode::Char('j')), &model);
    assert_eq!(msg, Some(Message::HideHelp));
    let model = update(model, msg.unwrap());
    assert!(!model.help_visible);
}

#[test]
fn test_quit_keys() {
    let app = create_test_app();
    let model = model_for(&app, "chat");
    assert_eq!(
        app.handle_key(key(KeyCode::Char('q')), &model),
        Some(Message::Quit)
    );
    assert_eq!(
        app.handle_key(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            &model
        ),
        Some(Message::Quit)
    );
    let model = update(model, Message::Quit);
    assert!(model.should_quit);
}

#[test]
fn test_history_keys() {
    let app = create_test_app();
    let model = model_for(&app, "chat");
    assert_eq!(
        app.handle_key(key(KeyCode::Backspace), &model),
        Some(Message::Back)
    );
    assert_eq!(
        app.handle_key(key(KeyCode::Char('l')), &model),
        Some(Message::Forward)
    );
}

#[test]
fn test_resize_rewraps_entry() {
    let app = create_test_app();
    let entry = WordEntry {
        word: "long".to_string(),
        groups: vec![LanguageGroup {
            language: "English".to_string(),
            senses: vec![Sense {
                part_of_speech: "Adjective".to_string(),
                gender: None,
                definition: "having great length from one end to the other end".to_string(),
                examples: Vec::new(),
            }],
        }],
    };
    let model = app.initial_model((80, 24), Some(entry));
    let wide_lines = model.document.line_count();

    let model = update(model, Message::Resize(30, 24));
    assert_eq!(model.viewport.width(), 30);
    assert_eq!(model.viewport.height(), 23);
    assert!(model.document.line_count() > wide_lines);
    assert_eq!(model.viewport.total_lines(), model.document.line_count());
}

#[test]
fn test_resize_debouncer_waits_for_quiet() {
    let mut debouncer = ResizeDebouncer::new(100);
    debouncer.queue(100, 40, 0);
    assert!(debouncer.is_pending());
    assert_eq!(debouncer.take_ready(50), None);
    debouncer.queue(120, 40, 60);
    assert_eq!(debouncer.take_ready(150), None);
    assert_eq!(debouncer.take_ready(160), Some((120, 40)));
    assert!(!debouncer.is_pending());
}

#[test]
fn test_resize_event_is_debounced() {
    let app = create_test_app();
    let model = model_for(&app, "chat");
    let mut debouncer = ResizeDebouncer::new(100);
    let msg = app.handle_event(Event::Resize(100, 30), &model, 0, &mut debouncer);
    assert_eq!(msg, None);
    assert!(debouncer.is_pending());
}

#[test]
fn test_toast_expires() {
    let mut model = create_long_test_model();
    model.show_toast(ToastLevel::Info, "hello");
    assert!(!model.expire_toast(std::time::Instant::now()));
    assert!(model.expire_toast(std::time::Instant::now() + std::time::Duration::from_secs(10)));
    assert!(model.active_toast().is_none());
}

#[test]
fn test_view_renders_into_frame() {
    let app = create_test_app();
    let model = model_for(&app, "chat");
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    terminal.draw(|frame| app.view(&model, frame)).unwrap();
    let content: String = terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect();
    assert!(content.contains("French"));
    assert!(content.contains("English"));
}

#[test]
fn test_visible_link_indices_follow_viewport() {
    let app = create_test_app();
    let mut model = model_for(&app, "cat");
    assert_eq!(model.visible_link_indices(), vec![0, 1]);

    let link_line = model.document.links()[0].line;
    model.viewport.resize(80, 1);
    model.viewport.ensure_visible(link_line + 1);
    assert!(model.visible_link_indices().is_empty());
}
