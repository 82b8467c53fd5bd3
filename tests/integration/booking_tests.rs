//! Integration tests for the booking workflow
//!
//! These tests run the full sequencer against a scripted page driver and
//! check the interactions it records end-to-end.

use flight_booker::config::{
    BookingConfig, BrowserConfig, ContactConfig, GatewayConfig, Passenger, PaymentConfig,
    TripConfig,
};
use flight_booker::page::selectors::{self, PassengerFields};
use flight_booker::page::{DriverCall, DriverError, ScriptedDriver};
use flight_booker::{BookingError, TripLeg, WorkflowSequencer, WorkflowStage};

use chrono::DateTime;

fn passenger(index: usize, surname: &str) -> Passenger {
    Passenger {
        index,
        surname: surname.to_string(),
        given_name: "Test".to_string(),
        sex: "MR".to_string(),
        birth_date: "1988/04/02".to_string(),
        national_id: format!("A12345678{}", index),
    }
}

/// Creates a test booking for the given passengers
fn create_test_config(passengers: Vec<Passenger>) -> BookingConfig {
    BookingConfig {
        gateway: GatewayConfig {
            url: "https://booking.example.com/".to_string(),
            origin: "RMQ".to_string(),
        },
        trip: TripConfig {
            expected_departure: DateTime::parse_from_rfc3339("2023-10-05T08:00:00+08:00").unwrap(),
            expected_arrival: DateTime::parse_from_rfc3339("2023-10-10T18:00:00+08:00").unwrap(),
        },
        passengers,
        contact: ContactConfig {
            mobile: "912345678".to_string(),
            email: "traveler@example.com".to_string(),
        },
        payment: PaymentConfig {
            card_type: 1,
            number: "4111111111111111".to_string(),
            expiry_month: "12".to_string(),
            expiry_year: "2030".to_string(),
            cvv: "123".to_string(),
        },
        browser: BrowserConfig::default(),
    }
}

/// Outbound matches in slot 1, return matches in slot 0
fn two_page_driver() -> ScriptedDriver {
    ScriptedDriver::new()
        .with_listing([
            Some("2023-10-05T06:30:00+08:00"),
            Some("2023-10-05T08:40:00+08:00"),
            Some("2023-10-05T07:50:00+08:00"),
            None,
            None,
            None,
        ])
        .with_listing([
            Some("2023-10-10T10:20:00Z"),
            Some("2023-10-10T18:10:00+08:00"),
            None,
            None,
            None,
            None,
        ])
}

fn position(calls: &[DriverCall], call: &DriverCall) -> usize {
    calls
        .iter()
        .position(|c| c == call)
        .unwrap_or_else(|| panic!("missing call: {}", call))
}

fn click(selector: &str) -> DriverCall {
    DriverCall::Click(selector.to_string())
}

fn type_text(selector: &str, text: &str) -> DriverCall {
    DriverCall::TypeText {
        selector: selector.to_string(),
        text: text.to_string(),
    }
}

#[tokio::test]
async fn test_end_to_end_two_passengers() {
    let config = create_test_config(vec![passenger(0, "Wang"), passenger(1, "Lin")]);
    let driver = two_page_driver();

    let report = WorkflowSequencer::new(&config, &driver).run().await.unwrap();

    assert_eq!(report.outbound_slot, 1);
    assert_eq!(report.return_slot, 0);
    assert_eq!(report.passengers_filled, 2);
    assert_eq!(report.stages.last(), Some(&WorkflowStage::FillPayment));

    let calls = driver.calls();

    // One extra traveler on top of the widget's default
    let adds = calls
        .iter()
        .filter(|c| **c == click(selectors::ADD_PASSENGER_BUTTON))
        .count();
    assert_eq!(adds, 1);

    assert!(calls.contains(&DriverCall::Select {
        selector: selectors::FARE_QUANTITY_SELECT.to_string(),
        value: "2".to_string(),
    }));

    let outbound = position(&calls, &click(&selectors::flight_select_button(1)));
    let inbound = position(&calls, &click(&selectors::flight_select_button(0)));
    assert!(outbound < inbound);

    // Exactly one complete fill per passenger
    for index in 0..2 {
        let fields = PassengerFields::at(index);
        let national_ids = calls
            .iter()
            .filter(|c| c.selector() == Some(fields.national_id.as_str()))
            .count();
        assert_eq!(national_ids, 1, "passenger {} filled more than once", index);
    }

    assert!(calls.contains(&DriverCall::Select {
        selector: selectors::CARD_TYPE_SELECT.to_string(),
        value: "VI".to_string(),
    }));
}

#[tokio::test]
async fn test_stage_ordering() {
    let config = create_test_config(vec![passenger(0, "Wang"), passenger(1, "Lin")]);
    let driver = two_page_driver();

    let report = WorkflowSequencer::new(&config, &driver).run().await.unwrap();
    assert_eq!(report.stages, WorkflowStage::all_stages().to_vec());

    // One landmark interaction per stage, in stage order
    let calls = driver.calls();
    let landmarks = [
        DriverCall::Navigate("https://booking.example.com/".to_string()),
        click(selectors::COOKIE_POLICY_BUTTON),
        click(selectors::ROUND_TRIP_TOGGLE),
        DriverCall::Select {
            selector: selectors::ORIGIN_SELECT.to_string(),
            value: "RMQ".to_string(),
        },
        DriverCall::TypeKeys("2023/10/05-2023/10/10".to_string()),
        click(selectors::PASSENGER_COUNT_DONE),
        click(selectors::SEARCH_BUTTON),
        click(&selectors::flight_select_button(1)),
        click(&selectors::flight_select_button(0)),
        DriverCall::Evaluate(selectors::click_script(selectors::TERMS_CHECKBOX)),
        type_text(&PassengerFields::at(0).surname, "Wang"),
        type_text(selectors::EMAIL_INPUT, "traveler@example.com"),
        DriverCall::Evaluate(selectors::click_script(selectors::USE_ONE_CARD_CHECKBOX)),
    ];
    assert_eq!(landmarks.len(), WorkflowStage::COUNT);

    let positions: Vec<usize> = landmarks.iter().map(|c| position(&calls, c)).collect();
    for pair in positions.windows(2) {
        assert!(pair[0] < pair[1], "stages out of order: {:?}", positions);
    }
}

#[tokio::test]
async fn test_passengers_filled_in_list_order() {
    // List order drives the fill order; index only picks the form row
    let config = create_test_config(vec![passenger(1, "Lin"), passenger(0, "Wang")]);
    let driver = two_page_driver();

    WorkflowSequencer::new(&config, &driver).run().await.unwrap();

    let calls = driver.calls();
    let lin = position(&calls, &type_text(&PassengerFields::at(1).surname, "Lin"));
    let wang = position(&calls, &type_text(&PassengerFields::at(0).surname, "Wang"));
    assert!(lin < wang);

    // Each row's birthday goes through the readonly picker sequence
    let picker = position(
        &calls,
        &DriverCall::ClearEditableFlag(PassengerFields::at(1).birthday.clone()),
    );
    assert_eq!(calls[picker + 1], DriverCall::DeleteCharacter);
    assert_eq!(calls[picker + 2], DriverCall::TypeKeys("1988/04/02".to_string()));
}

#[tokio::test]
async fn test_fail_fast_when_no_outbound_flight_matches() {
    let config = create_test_config(vec![passenger(0, "Wang")]);
    let driver = ScriptedDriver::new()
        .with_listing([
            Some("2023-10-05T07:00:00+08:00"),
            None,
            Some("2023-10-05T09:00:00+08:00"),
            Some("2023-10-05T12:00:00+08:00"),
            None,
            Some("2023-10-04T08:00:00+08:00"),
        ])
        .with_listing([Some("2023-10-10T18:00:00+08:00")]);

    let err = WorkflowSequencer::new(&config, &driver)
        .run()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BookingError::NoMatchingFlight {
            leg: TripLeg::Outbound
        }
    ));
    assert_eq!(err.stage(), Some(WorkflowStage::SelectOutboundFlight));
    assert_eq!(err.to_string(), "No matching departure time found");

    // Nothing after the scan ran
    let calls = driver.calls();
    assert_eq!(
        calls.last(),
        Some(&DriverCall::QueryAttribute {
            selector: selectors::flight_listing(5),
            attribute: selectors::DEPARTURE_ATTRIBUTE.to_string(),
        })
    );
    assert!(!calls.contains(&click(selectors::NEXT_STEP_BUTTON)));
    assert!(!calls.iter().any(|c| matches!(c, DriverCall::Evaluate(_))));
}

#[tokio::test]
async fn test_fail_fast_when_no_return_flight_matches() {
    let config = create_test_config(vec![passenger(0, "Wang")]);
    let driver = ScriptedDriver::new()
        .with_listing([Some("2023-10-05T08:30:00+08:00")])
        .with_listing([None, Some("2023-10-10T21:00:00+08:00")]);

    let err = WorkflowSequencer::new(&config, &driver)
        .run()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BookingError::NoMatchingFlight {
            leg: TripLeg::Return
        }
    ));
    assert_eq!(err.to_string(), "No matching return time found");
    assert!(!driver
        .calls()
        .contains(&DriverCall::Evaluate(selectors::click_script(
            selectors::TERMS_CHECKBOX
        ))));
}

#[tokio::test]
async fn test_page_waits_target_the_page_being_entered() {
    let config = create_test_config(vec![passenger(0, "Wang"), passenger(1, "Lin")]);
    let driver = two_page_driver();

    WorkflowSequencer::new(&config, &driver).run().await.unwrap();

    let calls = driver.calls();
    let next_step = click(selectors::NEXT_STEP_BUTTON);
    let mut page_start = position(&calls, &click(selectors::SEARCH_BUTTON)) + 1;
    let mut entered = Vec::new();

    for (i, call) in calls.iter().enumerate() {
        if *call != next_step {
            continue;
        }
        assert_eq!(
            calls.get(i + 1),
            Some(&DriverCall::WaitForNavigation),
            "step submitted at call {} without waiting for the next page",
            i
        );

        let awaited = calls[i + 2..]
            .iter()
            .find_map(|c| match c {
                DriverCall::WaitForElement(s) => Some(s.clone()),
                _ => None,
            })
            .unwrap_or_else(|| panic!("no element wait after call {}", i));

        // The return results reuse the outbound step wizard; only the
        // navigation wait separates them
        if awaited != selectors::RESULTS_VIEW {
            for left in calls[page_start..i].iter().filter_map(DriverCall::selector) {
                assert!(
                    !left.starts_with(awaited.as_str()),
                    "wait for {} is already satisfied by {} on the page being left",
                    awaited,
                    left
                );
            }
        }

        entered.push(awaited);
        page_start = i + 1;
    }

    assert_eq!(
        entered,
        vec![
            selectors::RESULTS_VIEW.to_string(),
            selectors::TERMS_CHECKBOX.to_string(),
            PassengerFields::at(0).surname,
            selectors::PAYMENT_PANEL.to_string(),
        ]
    );
}

#[tokio::test]
async fn test_interaction_failure_aborts_at_stage() {
    let config = create_test_config(vec![passenger(0, "Wang")]);
    let driver = two_page_driver().fail_on(selectors::TERMS_CHECKBOX);

    let err = WorkflowSequencer::new(&config, &driver)
        .run()
        .await
        .unwrap_err();

    match &err {
        BookingError::Interaction { stage, source } => {
            assert_eq!(*stage, WorkflowStage::AcceptTerms);
            assert!(matches!(source, DriverError::Timeout { .. }));
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let fields = PassengerFields::at(0);
    assert!(!driver
        .calls()
        .iter()
        .any(|c| c.selector() == Some(fields.surname.as_str())));
}

#[tokio::test]
async fn test_gateway_failure_stops_before_consent() {
    let config = create_test_config(vec![passenger(0, "Wang")]);
    let driver = two_page_driver().fail_on("https://booking.example.com/");

    let err = WorkflowSequencer::new(&config, &driver)
        .run()
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Some(WorkflowStage::OpenGateway));
    assert_eq!(driver.calls().len(), 1);
}

#[tokio::test]
async fn test_invalid_passenger_list_rejected_before_run() {
    let config = create_test_config(vec![passenger(0, "Wang"), passenger(0, "Lin")]);
    let driver = two_page_driver();

    let err = WorkflowSequencer::new(&config, &driver)
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, BookingError::Config(_)));
    assert!(driver.calls().is_empty());
}
