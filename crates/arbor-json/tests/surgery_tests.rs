use arbor_json::{decoder, encoder, ArborError, Document};

fn compact(doc: &Document, id: arbor_json::NodeId) -> String {
    encoder::print(doc, id, false).unwrap()
}

// ============================================================================
// Attach
// ============================================================================

#[test]
fn build_array_by_hand() {
    let mut doc = Document::new();
    let arr = doc.array().unwrap();
    for i in 0..3 {
        let n = doc.integer(i).unwrap();
        doc.add_to_array(arr, n).unwrap();
    }
    assert_eq!(compact(&doc, arr), "[0,1,2]");
}

#[test]
fn build_object_by_hand() {
    let mut doc = Document::new();
    let obj = doc.object().unwrap();
    let name = doc.string("Ada").unwrap();
    doc.add_to_object(obj, "name", name).unwrap();
    let year = doc.integer(1815).unwrap();
    doc.add_to_object_cs(obj, "born", year).unwrap();
    assert_eq!(compact(&doc, obj), r#"{"name":"Ada","born":1815}"#);
    assert_eq!(doc.key_of(year), Some("born"));
}

#[test]
fn attach_sets_parent() {
    let mut doc = Document::new();
    let arr = doc.array().unwrap();
    let n = doc.integer(1).unwrap();
    assert_eq!(doc.parent(n), None);
    doc.add_to_array(arr, n).unwrap();
    assert_eq!(doc.parent(n), Some(arr));
}

#[test]
fn attaching_twice_fails() {
    let mut doc = Document::new();
    let a = doc.array().unwrap();
    let b = doc.array().unwrap();
    let n = doc.integer(1).unwrap();
    doc.add_to_array(a, n).unwrap();
    assert_eq!(doc.add_to_array(b, n), Err(ArborError::AlreadyAttached));
    assert_eq!(doc.array_len(b), 0);
}

#[test]
fn attach_to_non_container_fails() {
    let mut doc = Document::new();
    let num = doc.integer(1).unwrap();
    let child = doc.null().unwrap();
    assert_eq!(doc.add_to_array(num, child), Err(ArborError::WrongKind));
    assert_eq!(
        doc.add_to_object(num, "k", child),
        Err(ArborError::WrongKind)
    );
    assert_eq!(doc.parent(child), None);
}

#[test]
fn self_attachment_is_a_cycle() {
    let mut doc = Document::new();
    let arr = doc.array().unwrap();
    assert_eq!(doc.add_to_array(arr, arr), Err(ArborError::WouldCycle));
}

#[test]
fn attaching_an_ancestor_is_a_cycle() {
    let mut doc = Document::new();
    let outer = doc.array().unwrap();
    let inner = doc.array().unwrap();
    doc.add_to_array(outer, inner).unwrap();
    assert_eq!(doc.add_to_array(inner, outer), Err(ArborError::WouldCycle));
    assert_eq!(doc.array_len(inner), 0);
}

#[test]
fn insert_at_positions() {
    let mut doc = Document::new();
    let arr = decoder::parse(&mut doc, "[1,3]").unwrap();
    let two = doc.integer(2).unwrap();
    doc.insert_at(arr, 1, two).unwrap();
    assert_eq!(compact(&doc, arr), "[1,2,3]");

    let four = doc.integer(4).unwrap();
    doc.insert_at(arr, 99, four).unwrap(); // past the end appends
    assert_eq!(compact(&doc, arr), "[1,2,3,4]");

    let zero = doc.integer(0).unwrap();
    doc.insert_at(arr, 0, zero).unwrap();
    assert_eq!(compact(&doc, arr), "[0,1,2,3,4]");
}

// ============================================================================
// Detach and delete
// ============================================================================

#[test]
fn detach_middle_element() {
    let mut doc = Document::new();
    let arr = decoder::parse(&mut doc, "[10,20,30]").unwrap();
    let taken = doc.detach_by_index(arr, 1).unwrap().unwrap();
    assert_eq!(compact(&doc, arr), "[10,30]");
    assert_eq!(doc.parent(taken), None);
    assert_eq!(compact(&doc, taken), "20");
    doc.destroy(taken).unwrap();
}

#[test]
fn detach_out_of_range_is_a_noop() {
    let mut doc = Document::new();
    let arr = decoder::parse(&mut doc, "[1]").unwrap();
    assert_eq!(doc.detach_by_index(arr, 5), Ok(None));
    assert_eq!(compact(&doc, arr), "[1]");
}

#[test]
fn detach_by_key_hands_back_the_member() {
    let mut doc = Document::new();
    let obj = decoder::parse(&mut doc, r#"{"a":1,"b":2}"#).unwrap();
    let b = doc.detach_by_key(obj, "b").unwrap().unwrap();
    assert_eq!(doc.int_value(b), Some(2));
    assert_eq!(compact(&doc, obj), r#"{"a":1}"#);
    assert_eq!(doc.detach_by_key(obj, "missing"), Ok(None));
    doc.destroy(b).unwrap();
}

#[test]
fn detach_reattach_round_trip() {
    let mut doc = Document::new();
    let arr = decoder::parse(&mut doc, r#"[1,{"k":2},3]"#).unwrap();
    let snapshot = doc.duplicate(arr, true).unwrap();
    let taken = doc.detach_by_index(arr, 1).unwrap().unwrap();
    doc.insert_at(arr, 1, taken).unwrap();
    assert!(doc.compare(arr, snapshot, true));
}

#[test]
fn detach_child_by_identity() {
    let mut doc = Document::new();
    let arr = decoder::parse(&mut doc, "[1,2]").unwrap();
    let second = doc.get_at(arr, 1).unwrap();
    doc.detach_child(arr, second).unwrap();
    assert_eq!(compact(&doc, arr), "[1]");

    let stranger = doc.integer(9).unwrap();
    assert_eq!(doc.detach_child(arr, stranger), Err(ArborError::NotFound));
}

#[test]
fn delete_frees_the_subtree() {
    let mut doc = Document::new();
    let obj = decoder::parse(&mut doc, r#"{"a":[1,2,3],"b":2}"#).unwrap();
    let before = doc.len();
    assert!(doc.delete_by_key(obj, "a").unwrap());
    assert_eq!(doc.len(), before - 4); // array plus three elements
    assert!(!doc.delete_by_key(obj, "a").unwrap());
    assert!(doc.delete_by_index(obj, 0).unwrap());
    assert_eq!(compact(&doc, obj), "{}");
}

// ============================================================================
// Replace
// ============================================================================

#[test]
fn replace_member_keeps_position_and_key() {
    let mut doc = Document::new();
    let obj = decoder::parse(&mut doc, r#"{"a":1,"b":[true,false,null],"c":3}"#).unwrap();
    let new = doc.int_array(&[7, 8]).unwrap();
    doc.replace_by_key(obj, "b", new).unwrap();
    assert_eq!(compact(&doc, obj), r#"{"a":1,"b":[7,8],"c":3}"#);
}

#[test]
fn replace_missing_key_inserts() {
    let mut doc = Document::new();
    let obj = decoder::parse(&mut doc, r#"{"a":1}"#).unwrap();
    let new = doc.integer(2).unwrap();
    doc.replace_by_key(obj, "b", new).unwrap();
    assert_eq!(compact(&doc, obj), r#"{"a":1,"b":2}"#);
}

#[test]
fn replace_by_index_frees_the_old_child() {
    let mut doc = Document::new();
    let arr = decoder::parse(&mut doc, r#"[[1,2],5]"#).unwrap();
    let old = doc.get_at(arr, 0).unwrap();
    let new = doc.string("x").unwrap();
    doc.replace_by_index(arr, 0, new).unwrap();
    assert_eq!(compact(&doc, arr), r#"["x",5]"#);
    assert_eq!(doc.kind(old), Err(ArborError::Stale));
}

#[test]
fn replace_out_of_range_fails() {
    let mut doc = Document::new();
    let arr = decoder::parse(&mut doc, "[1]").unwrap();
    let new = doc.integer(2).unwrap();
    assert_eq!(
        doc.replace_by_index(arr, 1, new),
        Err(ArborError::NotFound)
    );
    // the failed replacement did not consume the new node
    doc.add_to_array(arr, new).unwrap();
    assert_eq!(compact(&doc, arr), "[1,2]");
}

#[test]
fn replace_with_itself_is_a_noop() {
    let mut doc = Document::new();
    let arr = decoder::parse(&mut doc, "[1,2]").unwrap();
    let first = doc.get_at(arr, 0).unwrap();
    doc.replace_child(arr, first, first).unwrap();
    assert_eq!(compact(&doc, arr), "[1,2]");
    assert_eq!(doc.kind(first).is_ok(), true);
}

// ============================================================================
// References
// ============================================================================

#[test]
fn references_print_like_their_referent() {
    let mut doc = Document::new();
    let shared = decoder::parse(&mut doc, r#"{"k":"v"}"#).unwrap();
    let arr = doc.array().unwrap();
    let wrapper = doc.add_reference(arr, shared).unwrap();
    assert!(doc.is_reference(wrapper));
    assert!(doc.is_object(wrapper)); // predicates look through the wrapper
    assert_eq!(compact(&doc, arr), r#"[{"k":"v"}]"#);
}

#[test]
fn freeing_a_reference_spares_the_referent() {
    let mut doc = Document::new();
    let shared = decoder::parse(&mut doc, r#"{"k":"v"}"#).unwrap();
    let snapshot = doc.duplicate(shared, true).unwrap();
    let arr = doc.array().unwrap();
    doc.add_reference(arr, shared).unwrap();

    assert!(doc.delete_by_index(arr, 0).unwrap());
    assert!(doc.compare(shared, snapshot, true));
    assert_eq!(compact(&doc, shared), r#"{"k":"v"}"#);
}

#[test]
fn object_reference_carries_its_own_key() {
    let mut doc = Document::new();
    let shared = doc.string("payload").unwrap();
    let obj = doc.object().unwrap();
    doc.add_reference_to_object(obj, "alias", shared).unwrap();
    assert_eq!(compact(&doc, obj), r#"{"alias":"payload"}"#);
    // the referent itself never gained a key
    assert_eq!(doc.key_of(shared), None);
}
