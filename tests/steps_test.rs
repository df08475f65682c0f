//! End-to-end step scenarios against the mock browser

mod common;

use common::{setup, setup_with};
use oxide_steps::driver::MockAction;
use oxide_steps::{Config, Error, MockElement};
use std::time::Duration;
use tokio::time::Instant;

#[tokio::test]
async fn test_go_to_page_object_url() {
    let (driver, executor) = setup();

    executor.run("I go to 'Login'.'url'").await.unwrap();

    assert_eq!(
        driver.actions(),
        vec![MockAction::Navigate("https://x/login".to_string())]
    );
}

#[tokio::test(start_paused = true)]
async fn test_click_resolves_xpath_and_waits() {
    let (driver, executor) = setup();
    driver.add_element(
        "//button[@id='go']",
        MockElement::new("Go")
            .appearing_after(Duration::from_millis(200))
            .clickable_after(Duration::from_millis(600)),
    );

    let start = Instant::now();
    executor.run("I click 'Login'.'submit'").await.unwrap();

    assert!(start.elapsed() >= Duration::from_millis(600));
    assert_eq!(
        driver.actions(),
        vec![MockAction::Click("//button[@id='go']".to_string())]
    );
}

#[tokio::test]
async fn test_banner_text_contains() {
    let (driver, executor) = setup();
    driver.add_element(".banner", MockElement::new("Welcome, Bob"));

    executor
        .run("'Home'.'banner' text should contain 'Bob'")
        .await
        .unwrap();

    let err = executor
        .run("'Home'.'banner' text should contain 'Zara'")
        .await
        .unwrap_err();
    assert!(err.is_mismatch());
    assert_eq!(err.to_string(), "Welcome, Bob should contain Zara");
}

#[tokio::test]
async fn test_contains_boundaries() {
    let (driver, executor) = setup();
    driver.add_element(".banner", MockElement::new("Welcome, Bob"));

    for expected in [r#""""#, "'Welcome, Bob'", "'Welcome'", "', B'"] {
        executor
            .run(&format!("'Home'.'banner' text should contain {}", expected))
            .await
            .unwrap_or_else(|e| panic!("{}: {}", expected, e));
    }

    driver.add_element(".banner", MockElement::new(""));
    executor
        .run(r#"'Home'.'banner' text should contain """#)
        .await
        .unwrap();
    assert!(executor
        .run("'Home'.'banner' text should contain 'B'")
        .await
        .is_err());
}

#[tokio::test]
async fn test_url_regexp() {
    let (driver, executor) = setup();

    driver.set_url("https://x/dashboard/17");
    executor
        .run(r"URL should match /\/dashboard\/\d+/")
        .await
        .unwrap();

    driver.set_url("https://x/dashboard/");
    let err = executor
        .run(r"URL should match /\/dashboard\/\d+/")
        .await
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("https://x/dashboard/"));
    assert!(message.contains(r"\/dashboard\/\d+"));
    assert!(message.contains("should match regexp"));
}

#[tokio::test]
async fn test_missing_page_object_makes_no_driver_call() {
    let (driver, executor) = setup();

    for sentence in [
        "I go to 'Nope'.'url'",
        "I click 'Login'.'nope'",
        "I type 'Users'.'alice' in the 'Login'.'email'",
        "'Home'.'banner' text should be 'Users'.'alice'",
        "'Nope'.'x' should not be present",
    ] {
        let err = executor.run(sentence).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)), "{}: {}", sentence, err);
    }
    assert_eq!(driver.call_count(), 0);
}

#[tokio::test]
async fn test_click_if_present_on_absent_element() {
    let (driver, executor) = setup();

    executor
        .run("I click 'Login'.'submit' if present")
        .await
        .unwrap();
    assert!(driver.actions().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_presence_wait_times_out_on_budget() {
    let (_driver, executor) = setup_with(Config::default().with_custom_timeout(2500));

    let start = Instant::now();
    let err = executor
        .run("I wait for 'Home'.'banner' to be present")
        .await
        .unwrap_err();
    let elapsed = start.elapsed();

    assert!(matches!(err, Error::Timeout(_)));
    assert!(elapsed >= Duration::from_millis(2500));
    assert!(elapsed <= Duration::from_millis(2600));
    assert!(err.to_string().contains(".banner"));
}

#[tokio::test(start_paused = true)]
async fn test_explicit_wait_limits() {
    let (_driver, executor) = setup();

    let start = Instant::now();
    executor.run("I wait for 300100 ms").await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(300_100));

    let start = Instant::now();
    let err = executor.run("I wait for 300101 ms").await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test]
async fn test_login_scenario() {
    let (driver, executor) = setup();
    driver.add_element("#email", MockElement::new(""));
    driver.add_element("//button[@id='go']", MockElement::new("Go"));
    driver.set_title("Login");

    let report = executor
        .run_scenario([
            "Given I go to 'Login'.'url'",
            "Then the title should be 'Login'",
            "When I type 'Users'.'bob' in the 'Login'.'email'",
            "And I click 'Login'.'submit'",
            "Then URL should contain '/login'",
        ])
        .await;

    assert!(report.is_success(), "{:?}", report.failure);
    assert_eq!(report.passed, 5);
    assert_eq!(driver.typed_text("#email").as_deref(), Some("bob@x.io"));
}

#[tokio::test]
async fn test_file_empty_assertion() {
    let (_driver, executor) = setup();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("errors.log");

    std::fs::write(&path, "").unwrap();
    let sentence = format!("Then the file \"{}\" is empty", path.display());
    executor.run(&sentence).await.unwrap();

    std::fs::write(&path, "boom\n").unwrap();
    let err = executor.run(&sentence).await.unwrap_err();
    assert!(err.is_mismatch());
    assert!(err.to_string().ends_with(r#"should be empty but contains "boom\n""#));
}
