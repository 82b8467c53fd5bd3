//! Workflow sequencer - end-to-end booking orchestration
//!
//! Runs the booking stages strictly in order against a page driver:
//! - Fills the search form (trip type, origin, dates, traveler count)
//! - Picks the outbound and return flights with the candidate scanner
//! - Accepts the terms and fills passenger, contact and payment details
//!
//! The first failing stage aborts the run. Nothing is rolled back or retried,
//! and the payment form is left filled but not submitted.

use crate::booking::{CandidateScanner, StageContext, TripLeg, WorkflowStage};
use crate::config::{validate, BookingConfig, CardType, Passenger};
use crate::page::selectors::{self, PassengerFields};
use crate::page::{DriverResult, PageDriver};
use crate::window::{format_date_range, TimeWindowMatcher};
use crate::ConfigError;
use std::time::Duration;

/// Outcome of a completed booking run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingReport {
    /// Slot of the selected outbound flight
    pub outbound_slot: usize,
    /// Slot of the selected return flight
    pub return_slot: usize,
    /// Passenger form rows filled
    pub passengers_filled: usize,
    /// Stages completed, in execution order
    pub stages: Vec<WorkflowStage>,
}

impl BookingReport {
    fn complete(&mut self, stage: WorkflowStage) {
        tracing::debug!("Stage {} done", stage);
        self.stages.push(stage);
        if stage.is_final() {
            tracing::info!("Last stage done; the payment is left for manual submission");
        }
    }
}

/// Drives one booking run through every workflow stage
pub struct WorkflowSequencer<'a, D: PageDriver + ?Sized> {
    config: &'a BookingConfig,
    driver: &'a D,
    matcher: TimeWindowMatcher,
    timeout: Duration,
}

impl<'a, D: PageDriver + ?Sized> WorkflowSequencer<'a, D> {
    /// Creates a sequencer for `config`, interacting through `driver`
    pub fn new(config: &'a BookingConfig, driver: &'a D) -> Self {
        Self {
            config,
            driver,
            matcher: TimeWindowMatcher::new(&config.trip),
            timeout: config.browser.wait_timeout(),
        }
    }

    /// Runs the complete workflow
    ///
    /// The configuration is re-validated before the first page interaction so
    /// that a bad card type or passenger list never reaches the site.
    ///
    /// # Returns
    ///
    /// * `Ok(BookingReport)` - every stage completed
    /// * `Err(BookingError)` - the run was aborted at the first failure
    pub async fn run(&self) -> crate::Result<BookingReport> {
        validate(self.config)?;
        let card = self
            .config
            .payment
            .card_type()
            .ok_or(ConfigError::UnknownCardType(self.config.payment.card_type))?;

        let mut report = BookingReport::default();

        let stage = self.begin(WorkflowStage::OpenGateway);
        self.open_gateway().await.during(stage)?;
        report.complete(stage);

        let stage = self.begin(WorkflowStage::DismissConsent);
        self.driver
            .click(selectors::COOKIE_POLICY_BUTTON)
            .await
            .during(stage)?;
        report.complete(stage);

        let stage = self.begin(WorkflowStage::SelectRoundTrip);
        self.driver
            .click(selectors::ROUND_TRIP_TOGGLE)
            .await
            .during(stage)?;
        report.complete(stage);

        let stage = self.begin(WorkflowStage::SelectOrigin);
        self.select_origin().await.during(stage)?;
        report.complete(stage);

        let stage = self.begin(WorkflowStage::SelectDateRange);
        self.select_date_range().await.during(stage)?;
        report.complete(stage);

        let stage = self.begin(WorkflowStage::SelectPassengerCount);
        self.select_passenger_count().await.during(stage)?;
        report.complete(stage);

        let stage = self.begin(WorkflowStage::Search);
        self.search().await.during(stage)?;
        report.complete(stage);

        let stage = self.begin(WorkflowStage::SelectOutboundFlight);
        report.outbound_slot = self.select_outbound_flight().await?;
        report.complete(stage);

        let stage = self.begin(WorkflowStage::SelectInboundFlight);
        report.return_slot = self.select_inbound_flight().await?;
        report.complete(stage);

        let stage = self.begin(WorkflowStage::AcceptTerms);
        self.accept_terms().await.during(stage)?;
        report.complete(stage);

        let stage = self.begin(WorkflowStage::FillPassengers);
        report.passengers_filled = self.fill_passengers().await.during(stage)?;
        report.complete(stage);

        let stage = self.begin(WorkflowStage::FillContact);
        self.fill_contact().await.during(stage)?;
        report.complete(stage);

        let stage = self.begin(WorkflowStage::FillPayment);
        self.fill_payment(card).await.during(stage)?;
        report.complete(stage);

        tracing::info!(
            "Booking filled: outbound slot {}, return slot {}, {} passengers",
            report.outbound_slot,
            report.return_slot,
            report.passengers_filled
        );

        Ok(report)
    }

    fn begin(&self, stage: WorkflowStage) -> WorkflowStage {
        tracing::info!("[{}/{}] {}", stage.ordinal(), WorkflowStage::COUNT, stage);
        stage
    }

    async fn open_gateway(&self) -> DriverResult<()> {
        self.driver.navigate(&self.config.gateway.url).await
    }

    async fn select_origin(&self) -> DriverResult<()> {
        self.driver.click(selectors::ORIGIN_PANEL).await?;
        self.driver
            .select(selectors::ORIGIN_SELECT, &self.config.gateway.origin)
            .await
    }

    /// Types the range into the visible field and mirrors it into the
    /// hidden one the form actually submits
    async fn select_date_range(&self) -> DriverResult<()> {
        let range = format_date_range(
            &self.config.trip.expected_departure,
            &self.config.trip.expected_arrival,
        );
        tracing::info!("Trip dates: {}", range);

        self.driver.click(selectors::TRIP_DATE_PANEL).await?;
        self.driver
            .clear_editable_flag(selectors::TRIP_DATE_INPUT)
            .await?;
        self.driver.delete_character().await?;
        self.driver.type_keys(&range).await?;
        self.driver
            .set_hidden_value(selectors::TRIP_DATE_HIDDEN, &range)
            .await
    }

    /// The widget starts at one traveler, so only `n - 1` additions are made
    async fn select_passenger_count(&self) -> DriverResult<()> {
        let count = self.config.passengers.len();
        self.driver.click(selectors::PASSENGER_COUNT_PANEL).await?;
        for _ in 1..count {
            self.driver.click(selectors::ADD_PASSENGER_BUTTON).await?;
        }
        self.driver.click(selectors::PASSENGER_COUNT_DONE).await
    }

    async fn search(&self) -> DriverResult<()> {
        self.driver.click(selectors::SEARCH_BUTTON).await?;
        self.driver
            .wait_for_element(selectors::RESULTS_VIEW, self.timeout)
            .await
    }

    async fn select_outbound_flight(&self) -> crate::Result<usize> {
        let stage = TripLeg::Outbound.selection_stage();
        let slot = self.scan(TripLeg::Outbound).await?;

        self.choose_flight(slot).await.during(stage)?;
        self.confirm_fare_quantity().await.during(stage)?;
        self.advance().await.during(stage)?;

        Ok(slot)
    }

    /// Expects the browser to be on its way to the return results, which
    /// share their step wizard with the outbound page just left
    async fn select_inbound_flight(&self) -> crate::Result<usize> {
        let stage = TripLeg::Return.selection_stage();
        self.driver
            .wait_for_element(selectors::RESULTS_VIEW, self.timeout)
            .await
            .during(stage)?;

        let slot = self.scan(TripLeg::Return).await?;

        self.choose_flight(slot).await.during(stage)?;
        self.advance().await.during(stage)?;

        Ok(slot)
    }

    async fn scan(&self, leg: TripLeg) -> crate::Result<usize> {
        CandidateScanner::new(self.driver, &self.matcher)
            .select_candidate(leg)
            .await
    }

    async fn choose_flight(&self, slot: usize) -> DriverResult<()> {
        self.driver
            .click(&selectors::flight_select_button(slot))
            .await?;
        self.settle().await
    }

    /// Books one fare per passenger on the outbound fare table
    async fn confirm_fare_quantity(&self) -> DriverResult<()> {
        let count = self.config.passengers.len().to_string();
        self.driver
            .wait_for_element(selectors::FARE_QUANTITY_SELECT, self.timeout)
            .await?;
        self.driver
            .select(selectors::FARE_QUANTITY_SELECT, &count)
            .await
    }

    async fn accept_terms(&self) -> DriverResult<()> {
        self.driver
            .wait_for_element(selectors::TERMS_CHECKBOX, self.timeout)
            .await?;
        self.driver
            .evaluate(&selectors::click_script(selectors::TERMS_CHECKBOX))
            .await?;
        self.advance().await
    }

    /// Fills one form row per passenger, in list order
    ///
    /// Returns the number of rows filled.
    async fn fill_passengers(&self) -> DriverResult<usize> {
        // Row 0 is always present; indices are contiguous from zero
        self.driver
            .wait_for_element(&PassengerFields::at(0).surname, self.timeout)
            .await?;

        let mut filled = 0;
        for passenger in &self.config.passengers {
            tracing::debug!("Filling passenger row {}", passenger.index);
            self.fill_passenger(passenger).await?;
            filled += 1;
        }
        Ok(filled)
    }

    async fn fill_passenger(&self, passenger: &Passenger) -> DriverResult<()> {
        let fields = PassengerFields::at(passenger.index);

        self.driver
            .type_text(&fields.surname, &passenger.surname)
            .await?;
        self.driver
            .type_text(&fields.given_name, &passenger.given_name)
            .await?;
        self.driver.select(&fields.title, &passenger.sex).await?;

        // Birthday uses the same readonly picker as the trip dates
        self.driver
            .wait_for_element(&fields.birthday, self.timeout)
            .await?;
        self.driver.click(&fields.birthday).await?;
        self.driver.clear_editable_flag(&fields.birthday).await?;
        self.driver.delete_character().await?;
        self.driver.type_keys(&passenger.birth_date).await?;
        self.driver
            .set_hidden_value(&fields.birthday_hidden, &passenger.birth_date)
            .await?;

        self.driver.click(&fields.nationality_button).await?;
        self.driver
            .wait_for_element(selectors::NATIONALITY_FIRST_ITEM, self.timeout)
            .await?;
        self.driver.click(selectors::NATIONALITY_FIRST_ITEM).await?;

        self.driver
            .type_text(&fields.national_id, &passenger.national_id)
            .await
    }

    async fn fill_contact(&self) -> DriverResult<()> {
        let contact = &self.config.contact;

        self.driver.click(selectors::MOBILE_COUNTRY_BUTTON).await?;
        self.driver
            .wait_for_element(selectors::MOBILE_COUNTRY_FIRST_ITEM, self.timeout)
            .await?;
        self.driver
            .click(selectors::MOBILE_COUNTRY_FIRST_ITEM)
            .await?;
        self.driver
            .type_text(selectors::MOBILE_NUMBER_INPUT, &contact.mobile)
            .await?;
        self.driver
            .type_text(selectors::EMAIL_INPUT, &contact.email)
            .await?;
        self.advance().await
    }

    async fn fill_payment(&self, card: CardType) -> DriverResult<()> {
        let payment = &self.config.payment;
        tracing::info!("Paying with {} {}", card, payment.masked_number());

        self.driver
            .wait_for_element(selectors::PAYMENT_PANEL, self.timeout)
            .await?;
        self.driver
            .evaluate(&selectors::click_script(selectors::USE_ONE_CARD_CHECKBOX))
            .await?;
        self.driver
            .select(selectors::CARD_TYPE_SELECT, card.carrier_code())
            .await?;
        self.driver
            .type_text(selectors::CARD_NUMBER_INPUT, &payment.number)
            .await?;
        self.driver
            .select(selectors::CARD_EXPIRY_MONTH_SELECT, &payment.expiry_month)
            .await?;
        self.driver
            .select(selectors::CARD_EXPIRY_YEAR_SELECT, &payment.expiry_year)
            .await?;
        self.driver
            .type_text(selectors::CARD_CVV_INPUT, &payment.cvv)
            .await
    }

    /// Submits the current step and waits for the next page to load
    async fn advance(&self) -> DriverResult<()> {
        self.driver.click(selectors::NEXT_STEP_BUTTON).await?;
        self.driver.wait_for_navigation(self.timeout).await
    }

    /// Optional fixed pause after a flight is chosen
    async fn settle(&self) -> DriverResult<()> {
        match self.config.browser.settle_delay() {
            Some(delay) => self.driver.wait_fixed_delay(delay).await,
            None => Ok(()),
        }
    }
}
