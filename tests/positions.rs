use rustydom::{parse_with_options, NodeKind, ParseOptions, PositionRange, XmlDocument};

fn parse_tracked(xml: &str) -> XmlDocument {
    parse_with_options(xml, &ParseOptions::new().with_position_tracking(true)).unwrap()
}

fn span(range: Option<PositionRange>) -> Option<(usize, usize, usize, usize)> {
    range.map(|r| (r.start, r.end, r.line, r.column))
}

#[test]
fn test_doctype_and_self_closing() {
    let doc = parse_tracked("<!DOCTYPE test PUBLIC \"test\" \"test\"><x />");
    let doctype = doc.first_child(doc.root()).unwrap();
    let x = doc.document_element().unwrap();

    assert_eq!(span(doc.position(doctype)), Some((0, 36, 1, 1)));
    assert_eq!(span(doc.position(x)), Some((36, 41, 1, 37)));
    assert_eq!(span(doc.close_position(x)), Some((41, 41, 1, 42)));
}

#[test]
fn test_sibling_spans() {
    let doc = parse_tracked("<x><a></a><b /><c></c></x>");
    let x = doc.document_element().unwrap();
    let children: Vec<_> = doc.children(x).collect();

    assert_eq!(span(doc.position(x)), Some((0, 3, 1, 1)));
    assert_eq!(span(doc.position(children[0])), Some((3, 6, 1, 4)));
    assert_eq!(span(doc.close_position(children[0])), Some((6, 10, 1, 7)));
    assert_eq!(span(doc.position(children[1])), Some((10, 15, 1, 11)));
    assert_eq!(span(doc.close_position(children[1])), Some((15, 15, 1, 16)));
    assert_eq!(span(doc.position(children[2])), Some((15, 18, 1, 16)));
    assert_eq!(span(doc.close_position(children[2])), Some((18, 22, 1, 19)));
    assert_eq!(span(doc.close_position(x)), Some((22, 26, 1, 23)));
}

#[test]
fn test_multiline_attributes() {
    let xml = "<root-node nerf=\"derp\"\n\t\tsk=\"z\"><self-closing unit=\"\" /></root-node>";
    let doc = parse_tracked(xml);
    let root = doc.document_element().unwrap();
    let child = doc.first_child(root).unwrap();

    assert_eq!(span(doc.position(root)), Some((0, 32, 1, 1)));
    assert_eq!(span(doc.position(child)), Some((32, 56, 2, 10)));
    assert_eq!(span(doc.close_position(child)), Some((56, 56, 2, 34)));
    assert_eq!(span(doc.close_position(root)), Some((56, 68, 2, 34)));

    let ends: Vec<_> = doc.attributes(root).iter().map(|a| a.position.map(|p| p.end)).collect();
    assert_eq!(ends, vec![Some(22), Some(31)]);
    assert_eq!(&xml[..22], "<root-node nerf=\"derp\"");
    assert_eq!(doc.attributes(child)[0].position.map(|p| p.end), Some(53));
}

#[test]
fn test_text_and_comment_correction() {
    let xml = "<a>hi<!--c--><?pi x?><![CDATA[d]]></a>";
    let doc = parse_tracked(xml);
    let a = doc.document_element().unwrap();
    let children: Vec<_> = doc.children(a).collect();

    let slices: Vec<_> = children
        .iter()
        .map(|&c| doc.position(c).and_then(|p| p.slice(xml)).unwrap())
        .collect();
    assert_eq!(slices, vec!["hi", "<!--c-->", "<?pi x?>", "<![CDATA[d]]>"]);
    assert_eq!(span(doc.close_position(a)), Some((34, 38, 1, 35)));
}

#[test]
fn test_text_at_end_of_fragment() {
    let xml = "<a/>tail";
    let doc = parse_with_options(xml, &ParseOptions::new().with_position_tracking(true).with_fragment(true)).unwrap();
    let tail = doc.last_child(doc.root()).unwrap();
    assert_eq!(doc.position(tail).and_then(|p| p.slice(xml)), Some("tail"));
}

#[test]
fn test_round_trip() {
    let root_markup = "<root xmlns:a=\"urn:a\">\n  \
                       <a:item id=\"1\">one</a:item>\n  \
                       <!-- note -->\n  \
                       <empty/>\n  \
                       <?proc data?>\n  \
                       <![CDATA[<raw>]]>\n\
                       <caf\u{e9}>\u{e9}t\u{e9}</caf\u{e9}>\n\
                       </root>";
    let xml = format!("<?xml version=\"1.0\"?>\n<!DOCTYPE root SYSTEM \"root.dtd\">\n{root_markup}\n");
    let xml = xml.as_str();
    let doc = parse_tracked(xml);

    let mut previous_end = 0;
    let mut elements = Vec::new();
    for id in doc.descendants(doc.root()) {
        let range = doc.position(id).unwrap();
        assert!(range.start >= previous_end, "overlap at node {id}");
        assert!(range.end >= range.start);
        previous_end = range.end;
        let own = range.slice(xml).unwrap();

        match doc.kind(id).unwrap() {
            NodeKind::Element => {
                let close = doc.close_position(id).unwrap();
                elements.push((own, &xml[range.start..close.end], close.slice(xml).unwrap()));
            }
            NodeKind::Text => assert_eq!(own, doc.data(id).unwrap()),
            NodeKind::Comment => assert_eq!(own, "<!-- note -->"),
            NodeKind::CData => assert_eq!(own, "<![CDATA[<raw>]]>"),
            NodeKind::ProcessingInstruction => assert_eq!(own, "<?proc data?>"),
            NodeKind::DocumentType => assert_eq!(own, "<!DOCTYPE root SYSTEM \"root.dtd\">"),
            other => panic!("unexpected node kind {other:?}"),
        }
    }

    assert_eq!(
        elements,
        vec![
            ("<root xmlns:a=\"urn:a\">", root_markup, "</root>"),
            ("<a:item id=\"1\">", "<a:item id=\"1\">one</a:item>", "</a:item>"),
            ("<empty/>", "<empty/>", ""),
            ("<caf\u{e9}>", "<caf\u{e9}>\u{e9}t\u{e9}</caf\u{e9}>", "</caf\u{e9}>"),
        ]
    );

    let root = doc.document_element().unwrap();
    assert_eq!(doc.position(root).map(|p| p.line), Some(3));
}

#[test]
fn test_filtered_subtree_keeps_sibling_spans() {
    let xml = "<root><skip><deep>x</deep></skip><next/></root>";
    let options = ParseOptions::new()
        .with_position_tracking(true)
        .with_tag_filter(|el, _, _| el.name != "skip");
    let doc = parse_with_options(xml, &options).unwrap();
    let root = doc.document_element().unwrap();
    let next = doc.first_child(root).unwrap();

    assert_eq!(doc.position(next).and_then(|p| p.slice(xml)), Some("<next/>"));
    assert_eq!(doc.close_position(root).and_then(|p| p.slice(xml)), Some("</root>"));
}

#[test]
fn test_tracking_disabled() {
    let doc = parse_with_options("<a b=\"1\">t</a>", &ParseOptions::default()).unwrap();
    for id in doc.descendants(doc.root()) {
        assert!(doc.position(id).is_none());
        assert!(doc.close_position(id).is_none());
    }
    let a = doc.document_element().unwrap();
    assert!(doc.attributes(a)[0].position.is_none());
}
