//! Tests for end-to-end configuration resolution

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use elicit_core::hooks::builtin::TodayProducer;
use elicit_core::hooks::{check_with, process_with, produce_with};
use elicit_core::{
    CANCELED_MESSAGE, Configuration, ElementSpec, Error, Resolution, Resolver, SchemaError, Value,
};
use elicit_test_utils::{Answer, NoticeEvent, RecordingNotice, Request, ScriptedPrompter};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn resolver(prompter: &Arc<ScriptedPrompter>) -> Resolver {
    Resolver::new(prompter.clone())
}

mod validation_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[rstest]
    #[case::prompt(ElementSpec::new().display("Name?").value("x"), "prompt")]
    #[case::value(ElementSpec::new().prompt(false), "value")]
    #[case::display(ElementSpec::new().prompt(true).value("x"), "display")]
    #[tokio::test]
    async fn test_schema_error_issues_no_prompt(
        #[case] broken: ElementSpec,
        #[case] property: &'static str,
    ) {
        let prompter = Arc::new(ScriptedPrompter::replies(["never"]));
        let config = Configuration::new()
            .with("topic", ElementSpec::prompted("Topic?", "AI"))
            .with("filename", broken);

        let err = resolver(&prompter).resolve(&config).await.unwrap_err();

        match err {
            Error::Schema(SchemaError::MissingProperty { key, property: p }) => {
                assert_eq!(key, "filename");
                assert_eq!(p, property);
            }
            other => panic!("expected schema error, got {:?}", other),
        }
        assert_eq!(prompter.prompt_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_configuration_rejected() {
        let prompter = Arc::new(ScriptedPrompter::silent());
        let err = resolver(&prompter)
            .resolve(&Configuration::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "The configuration object is empty.");
    }

    #[tokio::test]
    async fn test_dangling_reference_detected_before_prompting() {
        let prompter = Arc::new(ScriptedPrompter::replies(["Rust"]));
        let config = Configuration::new()
            .with("topic", ElementSpec::prompted("Topic?", "AI"))
            .with("filename", ElementSpec::silent("{{ missing }}"));

        let err = resolver(&prompter).resolve(&config).await.unwrap_err();

        assert!(matches!(
            err,
            Error::DanglingReference { ref key, ref reference }
                if key == "filename" && reference == "missing"
        ));
        assert_eq!(prompter.prompt_count(), 0);
    }

    #[tokio::test]
    async fn test_static_cycle_detected_before_prompting() {
        let prompter = Arc::new(ScriptedPrompter::silent());
        let config = Configuration::new()
            .with("a", ElementSpec::silent("{{ b }}"))
            .with("b", ElementSpec::silent("{{ a }}"));

        let err = resolver(&prompter).resolve(&config).await.unwrap_err();

        match err {
            Error::CyclicReference { participants } => {
                assert_eq!(participants, vec!["a".to_string(), "b".to_string()]);
            }
            other => panic!("expected cycle, got {:?}", other),
        }
    }
}

mod ordering_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_independent_elements_prompted_in_order() {
        let prompter = Arc::new(ScriptedPrompter::replies(["1", "2", "3"]));
        let config = Configuration::new()
            .with("first", ElementSpec::prompted("First?", ""))
            .with("second", ElementSpec::prompted("Second?", ""))
            .with("third", ElementSpec::prompted("Third?", ""));

        let resolution = resolver(&prompter).resolve(&config).await.unwrap();

        let asked: Vec<String> = prompter
            .requests()
            .iter()
            .map(|r| r.display().to_string())
            .collect();
        assert_eq!(asked, vec!["First?", "Second?", "Third?"]);
        assert_eq!(resolution.text("third"), Some("3"));
    }

    #[tokio::test]
    async fn test_referencing_element_prompted_after_its_dependency() {
        let prompter = Arc::new(ScriptedPrompter::new([
            Answer::Reply("Rust".into()),
            Answer::Default,
        ]));
        let config = Configuration::new()
            .with("filename", ElementSpec::prompted("File name?", "Notes on {{ topic }}"))
            .with("topic", ElementSpec::prompted("Topic?", "AI"));

        let resolution = resolver(&prompter).resolve(&config).await.unwrap();

        let requests = prompter.requests();
        assert_eq!(requests[0].display(), "Topic?");
        match &requests[1] {
            Request::Text(r) => assert_eq!(r.default, "Notes on Rust"),
            other => panic!("expected text prompt, got {:?}", other),
        }
        assert_eq!(resolution.text("filename"), Some("Notes on Rust"));
    }

    #[tokio::test]
    async fn test_substitution_is_exact() {
        let prompter = Arc::new(ScriptedPrompter::silent());
        let config = Configuration::new()
            .with("greeting", ElementSpec::silent("Hello {{ name }}"))
            .with("name", ElementSpec::silent("World"));

        let resolution = resolver(&prompter).resolve(&config).await.unwrap();

        assert_eq!(resolution.text("greeting"), Some("Hello World"));
    }

    #[tokio::test]
    async fn test_list_reference_renders_joined() {
        let prompter = Arc::new(ScriptedPrompter::silent());
        let config = Configuration::new()
            .with("summary", ElementSpec::silent("Tags: {{tags}}"))
            .with("tags", ElementSpec::silent(vec!["a", "b"]));

        let resolution = resolver(&prompter).resolve(&config).await.unwrap();

        assert_eq!(resolution.text("summary"), Some("Tags: a, b"));
    }

    #[tokio::test]
    async fn test_substituted_text_is_not_expanded_again() {
        let prompter = Arc::new(ScriptedPrompter::replies(["{{ other }}"]));
        let config = Configuration::new()
            .with("raw", ElementSpec::prompted("Raw?", ""))
            .with("other", ElementSpec::silent("nope"))
            .with("out", ElementSpec::silent("[{{ raw }}]"));

        let resolution = resolver(&prompter).resolve(&config).await.unwrap();

        assert_eq!(resolution.text("out"), Some("[{{ other }}]"));
    }
}

mod hook_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_process_failure_restores_value_and_stops() {
        let prompter = Arc::new(ScriptedPrompter::silent());
        let later_produced = Arc::new(AtomicUsize::new(0));
        let counter = later_produced.clone();
        let config = Configuration::new()
            .with(
                "topic",
                ElementSpec::silent("keep me").process(process_with(|_, _| Err("boom".into()))),
            )
            .with(
                "later",
                ElementSpec::new().prompt(false).produced(produce_with(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(Value::from("later"))
                })),
            );

        let mut resolution = Resolution::new();
        let err = resolver(&prompter)
            .resolve_into(&config, &mut resolution)
            .await
            .unwrap_err();

        assert!(err.is_canceled());
        assert_eq!(err.to_string(), "Failed processing 'topic' configuration value.");
        assert_eq!(resolution.text("topic"), Some("keep me"));
        assert!(!resolution.contains_key("later"));
        assert_eq!(later_produced.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_check_rejection_names_key_and_value() {
        let prompter = Arc::new(ScriptedPrompter::silent());
        let config = Configuration::new().with(
            "filename",
            ElementSpec::silent("hi")
                .check(check_with(|v, _| Ok(v.to_string().chars().count() > 3))),
        );

        let err = resolver(&prompter).resolve(&config).await.unwrap_err();

        let message = err.to_string();
        assert!(message.contains("filename"), "{}", message);
        assert!(message.contains("'hi'"), "{}", message);
        assert!(matches!(err.root_cause(), Error::Validation { .. }));
    }

    #[tokio::test]
    async fn test_broken_check_does_not_echo_value() {
        let prompter = Arc::new(ScriptedPrompter::silent());
        let config = Configuration::new().with(
            "secret",
            ElementSpec::silent("hunter2").check(check_with(|_, _| Err("no network".into()))),
        );

        let err = resolver(&prompter).resolve(&config).await.unwrap_err();

        let message = err.to_string();
        assert!(message.contains("secret"));
        assert!(!message.contains("hunter2"));
        assert!(matches!(err.root_cause(), Error::Checking { .. }));
    }

    #[tokio::test]
    async fn test_processed_value_is_offered_again() {
        let prompter = Arc::new(ScriptedPrompter::new([
            Answer::Reply("  rust  ".into()),
            Answer::Default,
        ]));
        let config = Configuration::new().with(
            "topic",
            ElementSpec::prompted("Topic?", "AI")
                .process(process_with(|v, _| Ok(Value::from(v.to_string().trim())))),
        );

        let resolution = resolver(&prompter).resolve(&config).await.unwrap();

        assert_eq!(prompter.prompt_count(), 2);
        match &prompter.requests()[1] {
            Request::Text(r) => assert_eq!(r.default, "rust"),
            other => panic!("expected text prompt, got {:?}", other),
        }
        assert_eq!(resolution.text("topic"), Some("rust"));
    }

    #[tokio::test]
    async fn test_cancelled_reprompt_restores_unprocessed_value() {
        let prompter = Arc::new(ScriptedPrompter::new([
            Answer::Reply("  rust  ".into()),
            Answer::Cancel,
        ]));
        let config = Configuration::new().with(
            "topic",
            ElementSpec::prompted("Topic?", "AI")
                .process(process_with(|v, _| Ok(Value::from(v.to_string().trim())))),
        );

        let mut resolution = Resolution::new();
        let err = resolver(&prompter)
            .resolve_into(&config, &mut resolution)
            .await
            .unwrap_err();

        assert!(err.is_canceled());
        assert!(matches!(err.root_cause(), Error::Processing { key, .. } if key == "topic"));
        assert_eq!(resolution.text("topic"), Some("  rust  "));
        assert_eq!(prompter.prompt_count(), 2);
    }

    #[tokio::test]
    async fn test_bad_date_format_fails_producing() {
        let prompter = Arc::new(ScriptedPrompter::silent());
        let config = Configuration::new().with(
            "date",
            ElementSpec::new().prompt(false).produced(Arc::new(TodayProducer {
                format: "%Q".to_string(),
            })),
        );

        let err = resolver(&prompter).resolve(&config).await.unwrap_err();

        assert!(err.is_canceled());
        assert!(matches!(err.root_cause(), Error::Producing { key, .. } if key == "date"));
        assert_eq!(err.to_string(), "Failed producing 'date' configuration value.");
    }

    #[tokio::test]
    async fn test_notice_shown_while_processing() {
        let prompter = Arc::new(ScriptedPrompter::silent());
        let notice = Arc::new(RecordingNotice::new());
        let config = Configuration::new().with(
            "topic",
            ElementSpec::silent("ai").process(process_with(|v, _| {
                Ok(Value::from(v.to_string().to_uppercase()))
            })),
        );

        let resolution = resolver(&prompter)
            .with_notice(notice.clone())
            .resolve(&config)
            .await
            .unwrap();

        assert_eq!(resolution.text("topic"), Some("AI"));
        assert_eq!(
            notice.events(),
            vec![
                NoticeEvent::Open {
                    title: "Processing 'topic' value.".into(),
                    body: "Please wait while the 'topic' value is being processed...".into(),
                },
                NoticeEvent::Close,
            ]
        );
    }

    #[tokio::test]
    async fn test_notice_closed_when_processing_fails() {
        let prompter = Arc::new(ScriptedPrompter::silent());
        let notice = Arc::new(RecordingNotice::new());
        let config = Configuration::new().with(
            "topic",
            ElementSpec::silent("ai").process(process_with(|_, _| Err("boom".into()))),
        );

        let _ = resolver(&prompter)
            .with_notice(notice.clone())
            .resolve(&config)
            .await;

        assert!(notice.is_balanced());
        assert_eq!(notice.events().len(), 2);
    }

    #[tokio::test]
    async fn test_hooks_see_resolved_values() {
        let prompter = Arc::new(ScriptedPrompter::silent());
        let config = Configuration::new()
            .with("topic", ElementSpec::silent("Rust"))
            .with(
                "title",
                ElementSpec::silent("notes").process(process_with(|v, ctx| {
                    let topic = ctx.get("topic").map(Value::to_string).unwrap_or_default();
                    Ok(Value::from(format!("{} {}", topic, v)))
                })),
            );

        let resolution = resolver(&prompter).resolve(&config).await.unwrap();

        assert_eq!(resolution.text("title"), Some("Rust notes"));
    }
}

mod cancel_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_cancel_keeps_earlier_values() {
        let prompter = Arc::new(ScriptedPrompter::new([
            Answer::Reply("Rust".into()),
            Answer::Cancel,
        ]));
        let config = Configuration::new()
            .with("topic", ElementSpec::prompted("Topic?", "AI"))
            .with("filename", ElementSpec::prompted("Name?", "untitled"))
            .with("path", ElementSpec::prompted("Path?", "Notes"));

        let mut resolution = Resolution::new();
        let err = resolver(&prompter)
            .resolve_into(&config, &mut resolution)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), CANCELED_MESSAGE);
        assert!(matches!(err.root_cause(), Error::PromptCanceled { message: None }));
        assert_eq!(resolution.text("topic"), Some("Rust"));
        assert!(!resolution.contains_key("path"));
        assert_eq!(prompter.prompt_count(), 2);
    }

    #[tokio::test]
    async fn test_in_place_prompt_keeps_values_on_cancel() {
        let prompter = Arc::new(ScriptedPrompter::new([
            Answer::Reply("Rust".into()),
            Answer::Cancel,
        ]));
        let mut config = Configuration::new()
            .with("topic", ElementSpec::prompted("Topic?", "AI"))
            .with("filename", ElementSpec::prompted("Name?", "untitled"));

        let err = resolver(&prompter).prompt(&mut config).await.unwrap_err();

        assert!(err.is_canceled());
        assert_eq!(config.value("topic"), Some(&Value::from("Rust")));
    }

    #[tokio::test]
    async fn test_prompter_failure_message_is_kept() {
        let prompter = Arc::new(ScriptedPrompter::silent());
        let config = Configuration::new().with("topic", ElementSpec::prompted("Topic?", "AI"));

        let err = resolver(&prompter).resolve(&config).await.unwrap_err();

        assert_eq!(err.to_string(), "unexpected prompt: Topic?");
    }
}

mod choice_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_list_value_issues_choice_with_labels() {
        let prompter = Arc::new(ScriptedPrompter::new([Answer::Pick(1)]));
        let config = Configuration::new().with(
            "status",
            ElementSpec::prompted("Status?", vec!["open", "closed"])
                .labels(["Open", "Closed"])
                .limit(5),
        );

        let resolution = resolver(&prompter).resolve(&config).await.unwrap();

        match &prompter.requests()[0] {
            Request::Choice(r) => {
                assert_eq!(r.placeholder, "Status?");
                assert_eq!(r.labels, vec!["Open", "Closed"]);
                assert_eq!(r.items, vec!["open", "closed"]);
                assert_eq!(r.limit, Some(5));
            }
            other => panic!("expected choice prompt, got {:?}", other),
        }
        assert_eq!(resolution.get("status"), Some(&Value::from("closed")));
    }

    #[tokio::test]
    async fn test_label_function_maps_items() {
        let prompter = Arc::new(ScriptedPrompter::new([Answer::Default]));
        let config = Configuration::new().with(
            "status",
            ElementSpec::prompted("Status?", vec!["open", "closed"])
                .label_with(|item| item.to_uppercase()),
        );

        resolver(&prompter).resolve(&config).await.unwrap();

        match &prompter.requests()[0] {
            Request::Choice(r) => assert_eq!(r.labels, vec!["OPEN", "CLOSED"]),
            other => panic!("expected choice prompt, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_multiline_flag_reaches_text_prompt() {
        let prompter = Arc::new(ScriptedPrompter::replies(["first line\nsecond line"]));
        let config = Configuration::new().with(
            "summary",
            ElementSpec::prompted("Summary?", "").multiline(true),
        );

        let resolution = resolver(&prompter).resolve(&config).await.unwrap();

        match &prompter.requests()[0] {
            Request::Text(r) => {
                assert!(r.multiline);
                assert_eq!(r.message, "Summary?");
            }
            other => panic!("expected text prompt, got {:?}", other),
        }
        assert_eq!(resolution.text("summary"), Some("first line\nsecond line"));
    }

    #[tokio::test]
    async fn test_missing_labels_fall_back_to_items() {
        let prompter = Arc::new(ScriptedPrompter::new([Answer::Default]));
        let config = Configuration::new()
            .with("status", ElementSpec::prompted("Status?", vec!["open", "closed"]));

        let resolution = resolver(&prompter).resolve(&config).await.unwrap();

        match &prompter.requests()[0] {
            Request::Choice(r) => assert_eq!(r.labels, r.items),
            other => panic!("expected choice prompt, got {:?}", other),
        }
        assert_eq!(resolution.text("status"), Some("open"));
    }
}

mod scenario_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_prompted_filename() {
        let prompter = Arc::new(ScriptedPrompter::replies(["Meeting"]));
        let config = Configuration::new()
            .with("path", ElementSpec::silent("Notes"))
            .with("filename", ElementSpec::prompted("Name?", "untitled"));

        let resolution = resolver(&prompter).resolve(&config).await.unwrap();

        assert_eq!(resolution.text("path"), Some("Notes"));
        assert_eq!(resolution.text("filename"), Some("Meeting"));
        assert_eq!(prompter.prompt_count(), 1);
    }

    #[tokio::test]
    async fn test_filename_from_prompted_topic() {
        let prompter = Arc::new(ScriptedPrompter::replies(["Rust"]));
        let config = Configuration::new()
            .with("topic", ElementSpec::prompted("Topic?", "AI"))
            .with("filename", ElementSpec::silent("Notes on {{ topic }}"));

        let resolution = resolver(&prompter).resolve(&config).await.unwrap();

        assert_eq!(resolution.text("filename"), Some("Notes on Rust"));
    }

    #[tokio::test]
    async fn test_short_value_fails_check() {
        let prompter = Arc::new(ScriptedPrompter::silent());
        let config = Configuration::new().with(
            "filename",
            ElementSpec::silent("hi")
                .check(check_with(|v, _| Ok(v.to_string().chars().count() > 3))),
        );

        let err = resolver(&prompter).resolve(&config).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Invalid value 'hi' for 'filename' configuration element."
        );
    }
}
