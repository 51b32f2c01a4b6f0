
use blog_client::{
    validator::{self, Upload, WriteForm, ERROR_BLOCK_CLASS},
    Dom, UploadRules,
};
use blog_mock::MockDom;

fn write_page() -> (MockDom, blog_mock::NodeId) {
    common::init_tracing();
    let dom = MockDom::new();
    let form = dom.add(dom.root(), "form", &[("class", "post-form")]);
    dom.add(form, "input", &[("name", "title"), ("value", "")]);
    dom.add(form, "textarea", &[("name", "content"), ("value", "")]);
    (dom, form)
}

fn filled() -> WriteForm {
    WriteForm {
        title: String::from("Title"),
        content: String::from("Body"),
        category: String::from("3"),
        tags: String::from("1,2"),
        file: None,
    }
}

#[test]
fn invalid_form_gets_one_error_block() {
    let (dom, form) = write_page();
    let rules = UploadRules::default();
    let input = WriteForm {
        title: String::new(),
        ..filled()
    };

    let v = validator::check(&dom, &form, &input, &rules).unwrap();
    assert!(!v.is_valid());
    assert_eq!(dom.count(".error-messages"), 1);
    let block = dom.child_with_class(&form, ERROR_BLOCK_CLASS).unwrap();
    assert_eq!(dom.children(form)[0], block, "block is shown above the fields");
    assert_eq!(Some(dom.text(&block)), v.message());

    // resubmitting replaces the block instead of stacking another
    let input = WriteForm {
        file: Some(Upload {
            name: String::from("notes.txt"),
            size: 10,
        }),
        ..input
    };
    let v = validator::check(&dom, &form, &input, &rules).unwrap();
    assert_eq!(dom.count(".error-messages"), 1);
    let block = dom.child_with_class(&form, ERROR_BLOCK_CLASS).unwrap();
    assert_eq!(Some(dom.text(&block)), v.message());
}

#[test]
fn valid_form_clears_previous_errors() {
    let (dom, form) = write_page();
    let rules = UploadRules::default();
    let bad = WriteForm {
        tags: String::new(),
        ..filled()
    };
    validator::check(&dom, &form, &bad, &rules).unwrap();
    assert_eq!(dom.count(".error-messages"), 1);

    let v = validator::check(&dom, &form, &filled(), &rules).unwrap();
    assert!(v.is_valid());
    assert_eq!(dom.count(".error-messages"), 0);
    assert_eq!(dom.children(form).len(), 2);
}

#[test]
fn oversized_upload_is_blocked() {
    let (dom, form) = write_page();
    let rules = UploadRules::default();
    let input = WriteForm {
        file: Some(Upload {
            name: String::from("photo.JPG"),
            size: rules.max_bytes + 1,
        }),
        ..filled()
    };
    let v = validator::check(&dom, &form, &input, &rules).unwrap();
    assert!(!v.is_valid());
    assert_eq!(dom.count(".error-messages"), 1);

    let input = WriteForm {
        file: Some(Upload {
            name: String::from("photo.JPG"),
            size: rules.max_bytes,
        }),
        ..filled()
    };
    assert!(validator::check(&dom, &form, &input, &rules).unwrap().is_valid());
    assert_eq!(dom.count(".error-messages"), 0);
}

#[test]
fn fields_are_read_from_the_form() {
    let (dom, form) = write_page();
    dom.add(form, "select", &[("name", "category"), ("value", "2")]);
    dom.add(form, "input", &[("name", "tags"), ("value", "4")]);
    dom.add(form, "input", &[("name", "tags"), ("value", "5")]);
    let title = dom.query("[name=title]").unwrap();
    dom.set_value(title, "Hello");
    let content = dom.query("[name=content]").unwrap();
    dom.set_value(content, "World");

    let input = WriteForm::from_fields(&dom.form_fields(&form).unwrap(), None);
    assert_eq!(input.title, "Hello");
    assert_eq!(input.tags, "4,5");
    assert!(input.validate(&UploadRules::default()).is_valid());
}
