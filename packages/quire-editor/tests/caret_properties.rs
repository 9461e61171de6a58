use pretty_assertions::assert_eq;
use quire_dom::{DocumentConfig, TreeTraverser};
use quire_editor::caret::predicates::{is_after_atomic, is_before_atomic};
use quire_editor::node_type::{is_atomic, is_atomic_element};
use quire_editor::{CaretPosition, CaretWalker};
use quire_html::HtmlDocument;
use rstest::rstest;

#[rstest]
#[case::text_and_images("<p>ab<img>cd</p><p></p>")]
#[case::islands(
    r#"<p>a<span contenteditable="false">x<b>y</b></span></p><div contenteditable="false"><p>z</p></div>"#
)]
#[case::media_and_breaks("<p><video></video>one<br>two<audio></audio></p>")]
#[case::tables("<div><table><tbody><tr><td>1</td></tr></tbody></table></div><p>after</p>")]
fn walker_steps_round_trip(#[case] html: &str) {
    let doc = HtmlDocument::from_html(html, DocumentConfig::default());
    let walker = CaretWalker::new(&doc, doc.body_id());
    let positions = walker.positions();
    assert!(!positions.is_empty());

    for pos in &positions {
        if let Some(prev) = walker.prev(pos) {
            assert_eq!(walker.next(&prev), Some(*pos));
        }
        if let Some(next) = walker.next(pos) {
            assert_eq!(walker.prev(&next), Some(*pos));
        }
    }

    assert_eq!(walker.prev(&positions[0]), None);
    assert_eq!(walker.next(&positions[positions.len() - 1]), None);
}

#[rstest]
#[case::text_and_images(r#"<p>ab<img>cd<img style="display: block"></p><p></p>"#)]
#[case::islands(
    r#"<p>a<span contenteditable="false">x<b>y</b></span></p><div contenteditable="false"><p>z</p></div>"#
)]
#[case::media_and_breaks("<p><video></video>one<br>two<input><audio></audio></p>")]
#[case::tables("<div><table><tbody><tr><td>1</td></tr></tbody></table></div><p>after</p>")]
fn atomic_neighbours_are_classified(#[case] html: &str) {
    let doc = HtmlDocument::from_html(html, DocumentConfig::default());
    let body = doc.body_id();
    let nodes: Vec<usize> = TreeTraverser::new_with_root(&doc, body)
        .filter(|id| *id != body)
        .collect();

    let mut atomics = 0;
    for id in nodes {
        let node = doc.get_node(id).unwrap();
        if is_atomic_element(node) {
            atomics += 1;
            let before = CaretPosition::before(&doc, id).unwrap();
            let after = CaretPosition::after(&doc, id).unwrap();
            assert!(is_before_atomic(&doc, &before), "before {id}");
            assert!(is_after_atomic(&doc, &after), "after {id}");
        } else if is_atomic(node) {
            let before = CaretPosition::before(&doc, id).unwrap();
            let after = CaretPosition::after(&doc, id).unwrap();
            assert!(!is_before_atomic(&doc, &before), "before {id}");
            assert!(!is_after_atomic(&doc, &after), "after {id}");
        }
        if let Some(text) = node.text_data() {
            for offset in 0..=text.len_chars() {
                let pos = CaretPosition::new(id, offset);
                assert!(!is_before_atomic(&doc, &pos));
                assert!(!is_after_atomic(&doc, &pos));
            }
        }
    }
    assert!(atomics > 0);
}

#[test]
fn walker_ignores_positions_outside_the_root() {
    let doc = HtmlDocument::from_html("<p>ab</p><p>cd</p>", DocumentConfig::default());
    let body = doc.body_id();
    let first = doc.get_node(body).unwrap().children[0];
    let second = doc.get_node(body).unwrap().children[1];
    let cd = doc.get_node(second).unwrap().children[0];

    let walker = CaretWalker::new(&doc, first);
    assert_eq!(walker.next(&CaretPosition::new(cd, 0)), None);
    assert_eq!(walker.prev(&CaretPosition::new(cd, 0)), None);
    assert!(!walker.is_legal(&CaretPosition::new(cd, 0)));
}
