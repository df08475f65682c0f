//! Step glue for `tests/features`.

use std::time::Duration;

use cucumber::{given, then, when};
use oxide_steps::driver::MockAction;
use oxide_steps::MockElement;

use super::world::BrowserWorld;

// ---------------------------------------------------------------------------
// Given
// ---------------------------------------------------------------------------

#[given(regex = r#"^the page object "([^"]*)"\."([^"]*)" is "([^"]*)"$"#)]
fn page_object(world: &mut BrowserWorld, page: String, element: String, raw: String) {
    world.page_objects = std::mem::take(&mut world.page_objects).with(page, element, raw);
}

#[given(regex = r#"^the wait budget is (\d+) ms$"#)]
fn wait_budget(world: &mut BrowserWorld, ms: u64) {
    world.config.custom_timeout_ms = Some(ms);
}

#[given(regex = r#"^the fake browser is at "([^"]*)"$"#)]
fn browser_url(world: &mut BrowserWorld, url: String) {
    world.driver.set_url(url);
}

#[given(regex = r#"^the fake browser title is "([^"]*)"$"#)]
fn browser_title(world: &mut BrowserWorld, title: String) {
    world.driver.set_title(title);
}

#[given(regex = r#"^the fake browser shows "([^"]*)" with text "([^"]*)"$"#)]
fn shows_element(world: &mut BrowserWorld, selector: String, text: String) {
    world.driver.add_element(selector, MockElement::new(text));
}

#[given(regex = r#"^the fake browser shows a hidden "([^"]*)"$"#)]
fn shows_hidden(world: &mut BrowserWorld, selector: String) {
    world.driver.add_element(selector, MockElement::new("").hidden());
}

#[given(regex = r#"^the fake browser shows "([^"]*)" after (\d+) ms$"#)]
fn shows_later(world: &mut BrowserWorld, selector: String, ms: u64) {
    world
        .driver
        .add_element(selector, MockElement::new("").appearing_after(Duration::from_millis(ms)));
}

#[given(regex = r#"^an empty file "([^"]*)"$"#)]
fn empty_file(world: &mut BrowserWorld, name: String) -> anyhow::Result<()> {
    std::fs::write(world.files.path().join(name), "")?;
    Ok(())
}

#[given(regex = r#"^a file "([^"]*)" containing "([^"]*)"$"#)]
fn file_with(world: &mut BrowserWorld, name: String, contents: String) -> anyhow::Result<()> {
    std::fs::write(world.files.path().join(name), contents)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// When
// ---------------------------------------------------------------------------

#[when(regex = r"^(I (?:go|reload|click|wait|type) .+)$")]
async fn library_action(world: &mut BrowserWorld, sentence: String) -> anyhow::Result<()> {
    world.run_sentence(&sentence).await?;
    Ok(())
}

#[when(regex = r"^I try: (.+)$")]
async fn attempt(world: &mut BrowserWorld, sentence: String) {
    world.attempt(&sentence).await;
}

// ---------------------------------------------------------------------------
// Then
// ---------------------------------------------------------------------------

#[then(regex = r#"^((?:the title|the file|URL|"|').+)$"#)]
async fn library_assertion(world: &mut BrowserWorld, sentence: String) -> anyhow::Result<()> {
    world.run_sentence(&sentence).await?;
    Ok(())
}

#[then(regex = r#"^the last step failed with "(.*)"$"#)]
fn failed_with(world: &mut BrowserWorld, message: String) {
    let error = world.last_error.as_ref().expect("last step passed");
    assert_eq!(error.to_string(), message);
}

#[then(regex = r"^the last step failed with an? (timeout|mismatch)$")]
fn failed_with_kind(world: &mut BrowserWorld, kind: String) {
    let error = world.last_error.as_ref().expect("last step passed");
    match kind.as_str() {
        "timeout" => assert!(error.is_timeout(), "got {error}"),
        _ => assert!(error.is_mismatch(), "got {error}"),
    }
}

#[then("the last step passed")]
fn passed(world: &mut BrowserWorld) {
    assert!(world.last_error.is_none(), "got {:?}", world.last_error);
}

#[then(regex = r#"^the browser clicked "([^"]*)"$"#)]
fn clicked(world: &mut BrowserWorld, selector: String) {
    assert_eq!(world.clicks(), vec![selector]);
}

#[then("the browser did not click anything")]
fn no_clicks(world: &mut BrowserWorld) {
    assert!(world.clicks().is_empty());
}

#[then(regex = r#"^the browser navigated to "([^"]*)"$"#)]
fn navigated(world: &mut BrowserWorld, url: String) {
    assert!(world.driver.actions().contains(&MockAction::Navigate(url)));
}

#[then("the browser reloaded the page")]
fn reloaded(world: &mut BrowserWorld) {
    assert!(world.driver.actions().contains(&MockAction::Refresh));
}

#[then("the browser was not touched")]
fn untouched(world: &mut BrowserWorld) {
    assert_eq!(world.driver.call_count(), 0);
}

#[then(regex = r#"^the field "([^"]*)" received "([^"]*)"$"#)]
fn received_keys(world: &mut BrowserWorld, selector: String, text: String) {
    assert_eq!(world.driver.typed_text(&selector), Some(text));
}
