use keyboard_types::{Code, Key, Location, Modifiers};
use pretty_assertions::assert_eq;
use quire_dom::util::html_name;
use quire_dom::{DocumentConfig, DomRange, Rect, TreeTraverser};
use quire_editor::node_type::{SELECTED_ATTR, attr};
use quire_editor::{
    Direction, Editor, EditorConfig, ElementSelection, Notification, NotificationKind,
    OverrideState,
};
use quire_html::HtmlDocument;
use quire_traits::{ClipboardData, DispatchOutcome, HandlerResult, KeyEvent, PointerEvent, UiEvent};

fn editor_with(html: &str, config: EditorConfig) -> Editor {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let doc = HtmlDocument::from_html(html, DocumentConfig::default());
    let mut editor = Editor::from_body(doc, config);
    editor.focus();
    editor
}

fn editor(html: &str) -> Editor {
    editor_with(html, EditorConfig::default())
}

fn children(editor: &Editor, node: usize) -> Vec<usize> {
    editor.doc().get_node(node).unwrap().children.clone()
}

fn key(key: Key, code: Code) -> UiEvent {
    UiEvent::KeyPress(KeyEvent {
        key,
        code,
        modifiers: Modifiers::empty(),
        location: Location::Standard,
        is_auto_repeating: false,
        is_composing: false,
        text: None,
    })
}

fn marked_nodes(editor: &Editor) -> Vec<usize> {
    let doc = editor.doc();
    TreeTraverser::new(doc)
        .filter(|id| {
            doc.get_node(*id)
                .is_some_and(|node| attr(node, SELECTED_ATTR).is_some())
        })
        .collect()
}

#[test]
fn clicking_a_non_editable_image_selects_it() {
    let html = r#"<p>ab<img contenteditable="false" src="a.png">cd</p>"#;
    let mut editor = editor(html);
    let body = editor.root();
    let p = children(&editor, body)[0];
    let [ab, img, cd]: [usize; 3] = children(&editor, p).try_into().unwrap();

    let doc = editor.doc_mut();
    doc.set_node_rect(body, Rect::new(0.0, 0.0, 400.0, 100.0));
    doc.set_node_rect(p, Rect::new(0.0, 0.0, 400.0, 20.0));
    doc.set_node_rect(ab, Rect::new(0.0, 0.0, 20.0, 20.0));
    doc.set_node_rect(img, Rect::new(20.0, 0.0, 60.0, 20.0));
    doc.set_node_rect(cd, Rect::new(60.0, 0.0, 80.0, 20.0));

    let hit = editor.doc().hit(30.0, 10.0).unwrap();
    assert_eq!(hit.node_id, img);

    let mut down = UiEvent::MouseDown(PointerEvent::new(hit.node_id, 30.0, 10.0));
    assert!(editor.handle_ui_event(&mut down).is_default_prevented());

    assert_eq!(
        editor.override_state(),
        OverrideState::Element(ElementSelection {
            selected_element: img
        })
    );
    assert_eq!(editor.get_rng(), DomRange::select_node(editor.doc(), img));
    assert!(!editor.fake_caret_state().visible);
    assert_eq!(marked_nodes(&editor), vec![img]);
    assert_eq!(editor.get_content(), html);
}

#[test]
fn at_most_one_element_carries_the_selected_marker() {
    let mut editor = editor(
        r#"<p><span contenteditable="false">1</span><span contenteditable="false">2</span><em data-quire-selected="1">3</em></p>"#,
    );
    let p = children(&editor, editor.root())[0];
    let [first, second, _em]: [usize; 3] = children(&editor, p).try_into().unwrap();

    let range = DomRange::select_node(editor.doc(), first).unwrap();
    editor.set_rng(range, None);
    assert_eq!(marked_nodes(&editor), vec![first]);

    let range = DomRange::select_node(editor.doc(), second).unwrap();
    editor.set_rng(range, None);
    assert_eq!(marked_nodes(&editor), vec![second]);
    assert_eq!(editor.selected_element(), Some(second));

    editor.set_rng(DomRange::collapsed_at(p, 0), None);
    assert_eq!(marked_nodes(&editor), Vec::<usize>::new());
    assert_eq!(editor.selected_element(), None);
}

#[test]
fn backspace_after_a_video_deletes_it() {
    let mut editor = editor("<p>ab<video></video>cd</p>");
    let p = children(&editor, editor.root())[0];
    let [ab, _video, cd]: [usize; 3] = children(&editor, p).try_into().unwrap();

    // The caret right after the video is taken over by the fake caret
    editor.set_rng(DomRange::collapsed_at(cd, 0), None);
    assert_eq!(editor.override_state(), OverrideState::FakeCaret);
    assert!(editor.fake_caret_state().visible);

    let mut backspace = key(Key::Backspace, Code::Backspace);
    assert_eq!(
        editor.handle_ui_event(&mut backspace),
        DispatchOutcome::DefaultPrevented
    );
    assert_eq!(editor.get_content(), "<p>abcd</p>");
    assert_eq!(editor.doc().inner_html(p), "abcd");
    assert_eq!(editor.get_rng(), Some(DomRange::collapsed_at(ab, 2)));
    assert_eq!(editor.override_state(), OverrideState::Native);
}

#[test]
fn backspace_inside_plain_text_is_left_to_the_host() {
    let mut editor = editor("<p><video></video>abcd</p>");
    let p = children(&editor, editor.root())[0];
    let abcd = children(&editor, p)[1];

    editor.set_rng(DomRange::collapsed_at(abcd, 2), None);
    assert!(!editor.backspace_delete(false));

    let mut backspace = key(Key::Backspace, Code::Backspace);
    assert_eq!(editor.handle_ui_event(&mut backspace), DispatchOutcome::Proceed);
    assert_eq!(editor.get_content(), "<p><video></video>abcd</p>");
}

#[test]
fn carets_inside_void_elements_move_to_the_parent() {
    let mut editor = editor("<p><img><img></p>");
    let p = children(&editor, editor.root())[0];
    let [first, second]: [usize; 2] = children(&editor, p).try_into().unwrap();

    editor.set_rng(DomRange::collapsed_at(first, 1), None);
    let range = editor.get_rng().unwrap();
    assert_eq!(range, DomRange::collapsed_at(p, 1));

    editor.set_rng(DomRange::collapsed_at(second, 0), None);
    assert_eq!(editor.get_rng(), Some(DomRange::collapsed_at(p, 1)));
}

#[test]
fn copy_yields_the_selected_element() {
    let mut editor = editor(r#"<p>a<span contenteditable="false">x<b>y</b></span>b</p>"#);
    let p = children(&editor, editor.root())[0];
    let span = children(&editor, p)[1];
    let expected = editor.doc().outer_html(span);

    let range = DomRange::select_node(editor.doc(), span).unwrap();
    editor.set_rng(range, None);
    assert!(editor.doc().inner_html(editor.root()).contains("quire-offscreen-selection"));

    let mut copy = UiEvent::Copy(Some(ClipboardData::new()));
    assert!(editor.handle_ui_event(&mut copy).is_default_prevented());
    let UiEvent::Copy(Some(clipboard)) = copy else {
        panic!("copy event lost its payload");
    };
    assert_eq!(clipboard.get_data("text/html"), Some(expected.as_str()));
    assert_eq!(clipboard.get_data("text/plain"), Some("xy"));
}

#[test]
fn legacy_clipboard_shim_leaves_copy_native() {
    let mut config = EditorConfig::default();
    config.capabilities.legacy_clipboard_shim = true;
    let mut editor = editor_with(r#"<p>a<i contenteditable="false">x</i></p>"#, config);
    let p = children(&editor, editor.root())[0];
    let italic = children(&editor, p)[1];

    let range = DomRange::select_node(editor.doc(), italic).unwrap();
    editor.set_rng(range, None);
    assert_eq!(editor.selected_element(), Some(italic));
    let mirror = "<p style=\"font-size: 0\" data-quire-bogus=\"all\">\u{a0}</p><i contenteditable=\"false\">x</i>";
    assert!(editor.doc().inner_html(editor.root()).contains(mirror));

    let mut copy = UiEvent::Copy(Some(ClipboardData::new()));
    assert_eq!(editor.handle_ui_event(&mut copy), DispatchOutcome::Proceed);
    let UiEvent::Copy(Some(clipboard)) = copy else {
        panic!("copy event lost its payload");
    };
    assert!(clipboard.is_empty());
}

#[test]
fn mousedown_beside_a_block_island_shows_the_fake_caret() {
    let mut editor = editor(r#"<p>ab</p><div contenteditable="false">block</div>"#);
    let body = editor.root();
    let [p, island]: [usize; 2] = children(&editor, body).try_into().unwrap();
    let ab = children(&editor, p)[0];
    let block_text = children(&editor, island)[0];

    let doc = editor.doc_mut();
    doc.set_node_rect(body, Rect::new(0.0, 0.0, 400.0, 200.0));
    doc.set_node_rect(p, Rect::new(0.0, 0.0, 400.0, 20.0));
    doc.set_node_rect(ab, Rect::new(0.0, 0.0, 20.0, 20.0));
    doc.set_node_rect(island, Rect::new(0.0, 40.0, 200.0, 80.0));
    doc.set_node_rect(block_text, Rect::new(0.0, 40.0, 50.0, 60.0));

    let hit = editor.doc().hit(300.0, 60.0).unwrap();
    assert_eq!(hit.node_id, body);

    let mut down = UiEvent::MouseDown(PointerEvent::new(body, 300.0, 60.0));
    assert!(editor.handle_ui_event(&mut down).is_default_prevented());
    assert_eq!(editor.override_state(), OverrideState::FakeCaret);

    let state = editor.fake_caret_state();
    assert!(state.visible);
    assert!(!state.before_atomic);

    let container = editor.doc().get_node(island).unwrap().next_sibling().unwrap();
    assert_eq!(editor.get_rng(), Some(DomRange::collapsed_at(container, 0)));
    assert_eq!(
        editor.get_content(),
        r#"<p>ab</p><div contenteditable="false">block</div>"#
    );

    // Typing into the block caret container turns it into a real paragraph
    let doc = editor.doc_mut();
    let typed = doc.create_text_node("z");
    doc.append(container, &[typed]);
    editor.show_block_caret_container(container);

    assert!(!editor.fake_caret_state().visible);
    assert_eq!(editor.override_state(), OverrideState::Native);
    assert_eq!(
        editor.get_content(),
        r#"<p>ab</p><div contenteditable="false">block</div><p>z</p>"#
    );
}

#[test]
fn mouseup_next_to_an_inline_island_renders_a_caret_container() {
    let doc = HtmlDocument::from_html(
        r#"<p>ab<span contenteditable="false">x</span></p>"#,
        DocumentConfig::default(),
    );
    let mut editor = Editor::from_body(doc, EditorConfig::default());
    let p = children(&editor, editor.root())[0];
    let island = children(&editor, p)[1];

    // Unfocused, the fake caret cannot be shown and the range stays as given
    editor.set_rng(DomRange::collapsed_at(p, 2), None);
    assert_eq!(editor.get_rng(), Some(DomRange::collapsed_at(p, 2)));

    editor.focus();
    let mut up = UiEvent::MouseUp(PointerEvent::new(p, 5.0, 5.0));
    editor.handle_ui_event(&mut up);

    let container = editor.doc().get_node(island).unwrap().next_sibling().unwrap();
    assert_eq!(editor.doc().get_node(container).unwrap().text_content(), "\u{FEFF}");
    assert_eq!(editor.get_rng(), Some(DomRange::collapsed_at(container, 1)));
    assert!(editor.fake_caret_state().visible);

    editor.hide_fake_caret();
    assert_eq!(children(&editor, p).len(), 2);
}

#[test]
fn cancelled_show_caret_keeps_the_native_selection() {
    let mut editor = editor(r#"<p>ab<span contenteditable="false">x</span></p>"#);
    let p = children(&editor, editor.root())[0];
    let island = children(&editor, p)[1];
    let _veto = editor.on(NotificationKind::ShowCaret, |_, _| HandlerResult::PreventDefault);

    assert_eq!(editor.show_caret(Direction::Forward, island, true, true), None);
    editor.set_rng(DomRange::collapsed_at(p, 2), None);
    assert_eq!(editor.get_rng(), Some(DomRange::collapsed_at(p, 2)));
    assert_eq!(editor.override_state(), OverrideState::Native);
}

#[test]
fn tap_and_click_manage_island_selection() {
    let mut editor = editor(
        r#"<div contenteditable="false"><p contenteditable="true">caption</p><p>locked</p></div>"#,
    );
    let island = children(&editor, editor.root())[0];
    let [caption, locked]: [usize; 2] = children(&editor, island).try_into().unwrap();
    let locked_text = children(&editor, locked)[0];

    let mut tap = UiEvent::Tap(PointerEvent::new(locked_text, 1.0, 1.0));
    assert!(editor.handle_ui_event(&mut tap).is_default_prevented());
    assert_eq!(editor.selected_element(), Some(island));

    let mut click_locked = UiEvent::Click(PointerEvent::new(locked_text, 1.0, 1.0));
    assert!(editor.handle_ui_event(&mut click_locked).is_default_prevented());
    assert_eq!(editor.selected_element(), Some(island));

    let mut click_caption = UiEvent::Click(PointerEvent::new(caption, 1.0, 1.0));
    assert_eq!(editor.handle_ui_event(&mut click_caption), DispatchOutcome::Proceed);
    assert_eq!(editor.selected_element(), None);
}

#[test]
fn new_block_clears_the_element_selection() {
    let mut editor = editor(r#"<p>a</p><div contenteditable="false">x</div>"#);
    let [p, island]: [usize; 2] = children(&editor, editor.root()).try_into().unwrap();

    let range = DomRange::select_node(editor.doc(), island).unwrap();
    editor.set_rng(range, None);
    assert_eq!(editor.selected_element(), Some(island));

    editor.new_block(p);
    assert_eq!(editor.selected_element(), None);
    assert_eq!(marked_nodes(&editor), Vec::<usize>::new());
}

#[test]
fn typing_into_an_inline_caret_container_keeps_it() {
    let mut editor = editor(r#"<p>a<span contenteditable="false">x</span></p>"#);
    let p = children(&editor, editor.root())[0];
    let island = children(&editor, p)[1];

    let range = editor.show_caret(Direction::Forward, island, true, false);
    let container = editor.doc().get_node(island).unwrap().previous_sibling().unwrap();
    assert_eq!(range, Some(DomRange::collapsed_at(container, 1)));
    assert!(editor.fake_caret_state().visible);

    editor.doc_mut().mutate().set_node_text(container, "z\u{FEFF}");
    editor.set_rng(DomRange::collapsed_at(container, 1), None);

    assert!(editor.fake_caret_state().visible);
    assert_eq!(editor.get_rng(), Some(DomRange::collapsed_at(container, 1)));
    assert_eq!(editor.doc().get_node(container).unwrap().text_content(), "z\u{FEFF}");
}

#[test]
fn unusable_replacement_clone_falls_back_to_the_copy() {
    let mut editor = editor(r#"<p>a<span contenteditable="false">x<b>y</b></span>b</p>"#);
    let p = children(&editor, editor.root())[0];
    let span = children(&editor, p)[1];
    let expected = editor.doc().outer_html(span);
    let _swap = editor.on(NotificationKind::ObjectSelected, |notification, _| {
        if let Notification::ObjectSelected { target_clone, .. } = notification {
            *target_clone = 9999;
        }
        HandlerResult::Continue
    });

    let range = DomRange::select_node(editor.doc(), span).unwrap();
    editor.set_rng(range, None);
    assert_eq!(editor.selected_element(), Some(span));

    let mut copy = UiEvent::Copy(Some(ClipboardData::new()));
    assert!(editor.handle_ui_event(&mut copy).is_default_prevented());
    let UiEvent::Copy(Some(clipboard)) = copy else {
        panic!("copy event lost its payload");
    };
    assert_eq!(clipboard.get_data("text/html"), Some(expected.as_str()));
}

#[test]
fn listener_supplied_clone_is_mirrored() {
    let mut editor = editor(r#"<p>a<span contenteditable="false">x</span>b</p>"#);
    let p = children(&editor, editor.root())[0];
    let span = children(&editor, p)[1];
    let _swap = editor.on(NotificationKind::ObjectSelected, |notification, doc| {
        if let Notification::ObjectSelected { target_clone, .. } = notification {
            let mut mutr = doc.mutate();
            let em = mutr.create_element(html_name("em"), vec![]);
            let text = mutr.create_text_node("swap");
            mutr.append_children(em, &[text]);
            *target_clone = em;
        }
        HandlerResult::Continue
    });

    let range = DomRange::select_node(editor.doc(), span).unwrap();
    editor.set_rng(range, None);
    assert_eq!(editor.selected_element(), Some(span));

    let mut copy = UiEvent::Copy(Some(ClipboardData::new()));
    assert!(editor.handle_ui_event(&mut copy).is_default_prevented());
    let UiEvent::Copy(Some(clipboard)) = copy else {
        panic!("copy event lost its payload");
    };
    assert_eq!(clipboard.get_data("text/html"), Some("<em>swap</em>"));
}
