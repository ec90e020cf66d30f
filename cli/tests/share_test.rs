//! Integration tests for sharing calculator results

mod common;

use rstest::rstest;

#[rstest]
#[case(&["bmi", "--weight", "82", "--height", "180"], "nutrisculpt_bmi_calculator_result_result.png")]
#[case(&["calories", "--weight", "82", "--height", "180", "--age", "40"], "nutrisculpt_calories_calculator_result_result.png")]
#[case(&["macros", "--calories", "2400", "--preset", "keto"], "nutrisculpt_macros_calculator_result_result.png")]
#[case(&["one-rm", "--weight", "140", "--reps", "3", "--exercise", "deadlift"], "nutrisculpt_one-rm_calculator_result_result.png")]
#[case(&["heart-rate", "--age", "40", "--goal", "endurance"], "nutrisculpt_heart-rate_calculator_result_result.png")]
#[case(&["ideal-weight", "--height", "180", "--sex", "female"], "nutrisculpt_ideal-weight_calculator_result_result.png")]
#[case(&["water", "--weight", "82", "--age", "40", "--climate", "hot"], "nutrisculpt_water-intake_calculator_result_result.png")]
#[tokio::test]
async fn test_every_calculator_downloads_a_card(#[case] args: &[&str], #[case] file_name: &str) {
    let app = common::TestApp::new();
    let mut argv = args.to_vec();
    argv.extend(["--share", "download"]);

    let out = app.run(&argv).await.unwrap();

    assert!(out.ends_with(&format!("Downloaded {}", file_name)), "{}", out);
    let bytes = std::fs::read(app.download(file_name)).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[tokio::test]
async fn test_instagram_download_carries_instructions() {
    let app = common::TestApp::new();
    let out = app
        .run(&["water", "--weight", "70", "--age", "25", "--share", "instagram"])
        .await
        .unwrap();
    assert!(out.contains("Open Instagram"));
    assert!(app.download("nutrisculpt_water-intake_calculator_result_result.png").exists());
}

#[tokio::test]
async fn test_copy_uses_custom_message() {
    let app = common::TestApp::new();
    let out = app
        .run(&["bmi", "--weight", "70", "--height", "170", "--share", "copy", "--message", "New PB"])
        .await
        .unwrap();
    assert!(out.contains(
        "Copy this to share: New PB https://nutrisculpt.vercel.app/bmi?utm_source=share&utm_medium=social"
    ));
    assert!(out.ends_with("Link ready to paste."));
}

#[tokio::test]
async fn test_heart_rate_json_hides_inputs() {
    let app = common::TestApp::new();
    let out = app
        .run(&["heart-rate", "--age", "30", "--resting", "55", "--json"])
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["goal"], "General Fitness");
    assert!(json["zones"].as_str().unwrap().starts_with("Zone 2: "));
    assert!(json.get("maxHeartRate").is_none());
    assert!(json.get("restingHeartRate").is_none());
}

#[tokio::test]
async fn test_invalid_input_is_rejected() {
    let app = common::TestApp::new();
    let err = app
        .run(&["bmi", "--weight", "5", "--height", "170"])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Weight"));
}
