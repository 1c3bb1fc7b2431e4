//! End-to-end pipeline tests: source text in, rewritten text out.

use enzyme_rtl_codemod::{codes, convert, Conversion, ConvertError, ConvertOptions};

fn convert_ok(source: &str, options: &ConvertOptions) -> Conversion {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    convert(source, options).expect("conversion should succeed")
}

#[test]
fn swaps_enzyme_import_and_rewrites_test_id_find() {
    let source = r#"
import { shallow } from 'enzyme';
import Button from './Button';

function renderComponent(props) {
    return shallow(<Button {...props} />);
}

it('renders', () => {
    const wrapper = renderComponent();
    expect(wrapper.find('[data-testid="root"]').exists()).toBe(true);
});
"#;
    let options = ConvertOptions::new("/project/src/__tests__/Button.test.jsx");
    let out = convert_ok(source, &options);

    assert!(!out.code.contains("enzyme"));
    assert!(out
        .code
        .contains(r#"import { render, screen } from "@testing-library/react";"#));
    assert!(out.code.contains(r#""/project/src/__tests__/Button""#));
    assert!(out.code.contains("render(<Button"));
    assert!(out.code.contains(r#"screen.getByTestId("root")"#));
    assert!(out.code.contains("toBeInTheDocument()"));
    assert!(!out.code.contains(".exists()"));
    assert!(out.diagnostics.is_empty());
    assert_eq!(out.wrapper_bindings, vec!["wrapper".to_string()]);
}

#[test]
fn custom_test_id_attribute_in_string_selector() {
    let source = r#"
import { shallow } from 'enzyme';

const setup = () => shallow(<Panel />);

it('shows the element', () => {
    const wrapper = setup();
    expect(wrapper.find('[data-id="element"]')).toBeInTheDocument();
});
"#;
    let options = ConvertOptions::new("/app/src/Panel.test.jsx")
        .with_test_id_attribute("data-id");
    let out = convert_ok(source, &options);

    assert!(out.code.contains(r#"screen.getByTestId("element")"#));
    assert!(!out.code.contains("wrapper.find"));
}

#[test]
fn object_selector_under_negated_expectation_uses_query_by() {
    let source = r#"
import { shallow } from 'enzyme';

const setup = () => shallow(<Panel />);

it('hides the element', () => {
    const wrapper = setup();
    expect(wrapper.find({ 'data-id': 'element' })).not.toBeInTheDocument();
});
"#;
    let options = ConvertOptions::new("/app/src/Panel.test.jsx")
        .with_test_id_attribute("data-id");
    let out = convert_ok(source, &options);

    assert!(out.code.contains(r#"screen.queryByTestId("element")"#));
    assert!(!out.code.contains("getByTestId"));
}

#[test]
fn role_selector_becomes_get_by_role() {
    let source = r#"
import { mount } from 'enzyme';

const setup = () => mount(<Modal />);

it('opens', () => {
    const wrapper = setup();
    expect(wrapper.find('[role="dialog"]').exists()).toBe(true);
});
"#;
    let options = ConvertOptions::new("/app/src/Modal.test.jsx");
    let out = convert_ok(source, &options);

    assert!(out.code.contains(r#"screen.getByRole("dialog")"#));
}

#[test]
fn simulate_click_becomes_user_event_with_import() {
    let source = r#"
import { mount } from 'enzyme';

function renderPage() {
    return mount(<Page />);
}

it('clicks the button', () => {
    const component = renderPage();
    component.getByText('Button').simulate('click');
});
"#;
    let options = ConvertOptions::new("/app/src/Page.test.jsx");
    let out = convert_ok(source, &options);

    assert!(out
        .code
        .contains("userEvent.click(component.getByText('Button'))"));
    assert!(out
        .code
        .contains(r#"import userEvent from "@testing-library/user-event";"#));
    // Exactly one inserted import.
    assert_eq!(out.code.matches("@testing-library/user-event").count(), 1);
}

#[test]
fn hover_events_map_to_hover_and_unhover() {
    let source = r#"
import { mount } from 'enzyme';

const setup = () => mount(<Tip />);

it('hovers', () => {
    const wrapper = setup();
    wrapper.find('[data-testid="target"]').simulate('mouseEnter');
    wrapper.find('[data-testid="target"]').simulate('mouseleave');
});
"#;
    let options = ConvertOptions::new("/app/src/Tip.test.jsx");
    let out = convert_ok(source, &options);

    assert!(out
        .code
        .contains(r#"userEvent.hover(screen.getByTestId("target"))"#));
    assert!(out
        .code
        .contains(r#"userEvent.unhover(screen.getByTestId("target"))"#));
}

#[test]
fn unmapped_simulate_event_is_left_and_annotated() {
    let source = r#"
import { mount } from 'enzyme';

const setup = () => mount(<Form />);

it('submits', () => {
    const wrapper = setup();
    wrapper.simulate('submit');
});
"#;
    let options = ConvertOptions::new("/app/src/Form.test.jsx");
    let out = convert_ok(source, &options);

    assert!(out.code.contains("wrapper.simulate('submit')"));
    assert!(out.code.contains("rtl-migration:"));
    assert!(out.code.contains("userEvent or fireEvent"));
    assert!(!out.code.contains("@testing-library/user-event"));
}

#[test]
fn existence_assertion_shapes_rewrite_to_in_the_document() {
    let source = r#"
import { shallow } from 'enzyme';

const setup = () => shallow(<List />);

it('checks presence', () => {
    const wrapper = setup();
    expect(wrapper.find('[data-testid="a"]').exists()).toBe(true);
    expect(wrapper.find('[data-testid="b"]').exists()).toEqual(false);
    expect(wrapper.find('[data-testid="c"]').exists()).toBeTruthy();
    expect(wrapper.find('[data-testid="d"]').exists()).toBeFalsy();
});
"#;
    let options = ConvertOptions::new("/app/src/List.test.jsx");
    let out = convert_ok(source, &options);

    assert!(!out.code.contains(".exists()"));
    assert!(out
        .code
        .contains(r#"expect(screen.getByTestId("a")).toBeInTheDocument()"#));
    assert!(out
        .code
        .contains(r#"expect(screen.getByTestId("b")).not.toBeInTheDocument()"#));
    assert!(out
        .code
        .contains(r#"expect(screen.getByTestId("c")).toBeInTheDocument()"#));
    assert!(out
        .code
        .contains(r#"expect(screen.getByTestId("d")).not.toBeInTheDocument()"#));
}

#[test]
fn text_assertion_becomes_to_have_text_content() {
    let source = r#"
import { shallow } from 'enzyme';

const setup = () => shallow(<Card />);

it('shows the title', () => {
    const wrapper = setup();
    expect(wrapper.find('[data-testid="title"]').text()).toEqual('Hello');
    expect(wrapper.find('[data-testid="subtitle"]').text()).toContain('World');
    expect(wrapper.find('[data-testid="footer"]').text()).toBe('Bye');
});
"#;
    let options = ConvertOptions::new("/app/src/Card.test.jsx");
    let out = convert_ok(source, &options);

    assert!(out.code.contains("toHaveTextContent('Hello')"));
    assert!(out.code.contains("toHaveTextContent('World')"));
    assert!(out.code.contains("toHaveTextContent('Bye')"));
    assert!(out.code.contains(r#"screen.getByTestId("title")"#));
    assert!(!out.code.contains(".text()"));
    assert!(!out.code.contains("toContain"));
    assert_eq!(out.code.matches("toHaveTextContent").count(), 3);
}

#[test]
fn chain_noise_is_stripped() {
    let source = r#"
import { mount } from 'enzyme';

const setup = () => mount(<List />);

it('finds the row', () => {
    const wrapper = setup();
    wrapper.update();
    expect(wrapper.find('[data-testid="row"]').first().exists()).toBe(false);
    const node = wrapper.find('[data-testid="row"]').hostNodes();
});
"#;
    let options = ConvertOptions::new("/app/src/List.test.jsx");
    let out = convert_ok(source, &options);

    assert!(!out.code.contains(".update()"));
    assert!(!out.code.contains(".first()"));
    assert!(!out.code.contains(".hostNodes()"));
    assert!(out
        .code
        .contains(r#"expect(screen.getByTestId("row")).not.toBeInTheDocument()"#));
    assert!(out.code.contains(r#"const node = screen.getByTestId("row");"#));
}

#[test]
fn set_state_call_gets_suggestion_comment_before_statement() {
    let source = r#"
import { shallow } from 'enzyme';

const setup = () => shallow(<Widget />);

it('updates state', () => {
    const wrapper = setup();
    wrapper.setState({ open: true });
});
"#;
    let options = ConvertOptions::new("/app/src/Widget.test.jsx");
    let out = convert_ok(source, &options);

    assert!(out.code.contains("rtl-migration:"));
    assert!(out.code.contains("`wrapper.setState({...})`"));
    assert!(out.code.contains("drive the UI"));
    // The comment precedes the statement that holds the call.
    let comment_at = out.code.find("rtl-migration:").unwrap();
    let call_at = out.code.find("open: true").unwrap();
    assert!(comment_at < call_at);
}

#[test]
fn direct_shallow_without_helper_uses_fallback_resolution() {
    let source = r#"
import { shallow } from 'enzyme';

it('renders directly', () => {
    const wrapper = shallow(<Menu />);
    wrapper.setProps({ open: true });
});
"#;
    let options = ConvertOptions::new("/app/src/Menu.test.jsx");
    let out = convert_ok(source, &options);

    assert!(out.code.contains("render(<Menu"));
    assert!(!out.code.contains("const wrapper"));
    assert_eq!(out.wrapper_bindings, vec!["wrapper".to_string()]);
    assert!(out.code.contains("rerender"));
}

#[test]
fn assignment_collapse_removes_dangling_let() {
    let source = r#"
import { mount } from 'enzyme';

const setup = () => mount(<App />);

it('reassigns', () => {
    let wrapper;
    wrapper = setup();
    wrapper.debug();
});
"#;
    let options = ConvertOptions::new("/app/src/App.test.jsx");
    let out = convert_ok(source, &options);

    assert!(!out.code.contains("let wrapper"));
    assert!(!out.code.contains("wrapper = setup()"));
    assert!(out.code.contains("setup();"));
    assert_eq!(out.wrapper_bindings, vec!["wrapper".to_string()]);
    assert!(out.code.contains("screen.debug()"));
}

#[test]
fn helper_named_render_is_disambiguated() {
    let source = r#"
import { shallow } from 'enzyme';

function render(props) {
    return shallow(<Form {...props} />);
}

it('renders', () => {
    const wrapper = render();
});
"#;
    let options = ConvertOptions::new("/app/src/Form.test.jsx");
    let out = convert_ok(source, &options);

    assert!(out.code.contains("function renderComponent("));
    assert!(out.code.contains("renderComponent();"));
    assert_eq!(out.wrapper_bindings, vec!["wrapper".to_string()]);
}

#[test]
fn opaque_find_selector_is_annotated_not_rewritten() {
    let source = r#"
import { shallow } from 'enzyme';

const setup = () => shallow(<Row />);

it('matches component', () => {
    const wrapper = setup();
    expect(wrapper.find(Row).exists()).toBe(true);
});
"#;
    let options = ConvertOptions::new("/app/src/Row.test.jsx");
    let out = convert_ok(source, &options);

    assert!(out.code.contains("wrapper.find(Row)"));
    assert!(out.code.contains("toBeInTheDocument()"));
    // Without a snapshot the comment carries the generic guidance.
    assert!(out.code.contains("rtl-migration:"));
    assert!(out.code.contains("`wrapper.find(Row)`"));
    assert!(out
        .code
        .contains("query the rendered output with screen.getByRole or screen.getByTestId"));
}

#[test]
fn find_annotation_names_snapshot_candidates() {
    let source = r#"
import { shallow } from 'enzyme';

const setup = () => shallow(<Row />);

it('matches component', () => {
    const wrapper = setup();
    expect(wrapper.find('.row-cell').exists()).toBe(true);
});
"#;
    let options = ConvertOptions::new("/app/src/Row.test.jsx")
        .with_rendered_dom(r#"<table role="grid"><td data-testid="cell">x</td></table>"#);
    let out = convert_ok(source, &options);

    assert!(out.code.contains("wrapper.find('.row-cell')"));
    assert!(out.code.contains("test ids [cell]"));
    assert!(out.code.contains("roles [grid]"));
    assert!(out
        .code
        .contains("screen.getByTestId(...) or screen.getByRole(...)"));
}

#[test]
fn jest_mock_paths_are_absolutized() {
    let source = r#"
import { shallow } from 'enzyme';
import { fetchRows } from '../api/client';

jest.mock('../api/client');

const setup = () => shallow(<Table />);

it('renders', () => {
    const wrapper = setup();
});
"#;
    let options = ConvertOptions::new("/project/src/components/__tests__/Table.test.jsx");
    let out = convert_ok(source, &options);

    assert_eq!(
        out.code.matches(r#""/project/src/components/api/client""#).count(),
        2
    );
    assert!(!out.code.contains("'../api/client'"));
}

#[test]
fn mixed_primitives_are_rejected() {
    let source = r#"
import { shallow, mount } from 'enzyme';
const a = shallow(<A />);
const b = mount(<B />);
"#;
    let options = ConvertOptions::new("/app/src/Mixed.test.jsx");
    let err = convert(source, &options).unwrap_err();
    assert!(matches!(err, ConvertError::MixedRenderPrimitives));
}

#[test]
fn unparseable_input_produces_no_partial_output() {
    let options = ConvertOptions::new("/app/src/Broken.test.js");
    let err = convert("const = nope(;", &options).unwrap_err();
    assert!(matches!(err, ConvertError::Parse { .. }));
}

#[test]
fn file_without_legacy_usage_emits_two_absence_diagnostics() {
    let source = r#"
import { render, screen } from "@testing-library/react";

it('already converted', () => {
    render(<Thing />);
    expect(screen.getByTestId("x")).toBeInTheDocument();
});
"#;
    let options = ConvertOptions::new("/app/src/Thing.test.jsx");
    let out = convert_ok(source, &options);

    let mut emitted: Vec<u32> = out.diagnostics.iter().map(|d| d.code).collect();
    emitted.sort_unstable();
    assert_eq!(emitted, vec![codes::NO_ENZYME_IMPORT, codes::NO_RENDER_PRIMITIVE]);
    assert!(out.wrapper_bindings.is_empty());
    // No second RTL import, no stray rewrites.
    assert_eq!(out.code.matches("@testing-library/react").count(), 1);
}

#[test]
fn converted_output_is_a_fixpoint() {
    let source = r#"
import { shallow } from 'enzyme';
import Button from './Button';

function renderComponent(props) {
    return shallow(<Button {...props} />);
}

it('renders', () => {
    const wrapper = renderComponent();
    expect(wrapper.find('[data-testid="root"]').exists()).toBe(true);
    wrapper.setState({ open: true });
});
"#;
    let options = ConvertOptions::new("/project/src/__tests__/Button.test.jsx");
    let first = convert_ok(source, &options);
    let second = convert_ok(&first.code, &options);

    assert_eq!(first.code, second.code);
    // One suggestion comment, not two.
    assert_eq!(second.code.matches("rtl-migration:").count(), 1);
}

#[test]
fn options_deserialize_from_json() {
    let options: ConvertOptions = serde_json::from_str(
        r#"{ "testIdAttribute": "data-qa", "filePath": "/a/b.test.tsx", "renderedDom": "<div/>" }"#,
    )
    .unwrap();
    assert_eq!(options.test_id_attribute, "data-qa");
    assert_eq!(options.file_path.to_str(), Some("/a/b.test.tsx"));
    assert_eq!(options.rendered_dom.as_deref(), Some("<div/>"));

    let bare: ConvertOptions = serde_json::from_str(r#"{ "filePath": "/a/b.test.js" }"#).unwrap();
    assert!(bare.rendered_dom.is_none());
}
