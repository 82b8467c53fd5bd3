//! Element selectors of the booking site
//!
//! The flow targets one fixed site, so its element ids live here as data
//! rather than being spread across the workflow.

/// Number of flight listings shown per results page
pub const FLIGHT_SLOT_COUNT: usize = 6;

/// Attribute carrying a listing's departure date-time
pub const DEPARTURE_ATTRIBUTE: &str = "data-dep";

pub const COOKIE_POLICY_BUTTON: &str = "#btn_ViewPolicy";

pub const ROUND_TRIP_TOGGLE: &str = "#pnl_page > div:nth-child(4) > div > div.-booking-widget.aos-init.aos-animate > div.input-form > div.row.mb-3 > div.col-auto > div > label:nth-child(2)";

pub const ORIGIN_PANEL: &str = "#CPH_Body_pnl_BookingWidget_DEP > div";
pub const ORIGIN_SELECT: &str = "#ddl_DEP";

pub const TRIP_DATE_PANEL: &str = "#CPH_Body_pnl_BookingWidget_TRIP_DATE > div";
pub const TRIP_DATE_INPUT: &str = "#CPH_Body_tb_TRIP_DATE";
pub const TRIP_DATE_HIDDEN: &str = "#CPH_Body_hi_TRIP_DATE";

pub const PASSENGER_COUNT_PANEL: &str = "#CPH_Body_pnl_BookingWidget_PAX_NUM";
pub const ADD_PASSENGER_BUTTON: &str = "#CPH_Body_pnl_BookingWidget_PAX_NUM > div > div > div:nth-child(1) > div > div.col-5 > div > div:nth-child(3) > button";
pub const PASSENGER_COUNT_DONE: &str = "#CPH_Body_pnl_BookingWidget_PAX_NUM > div > div > button";

pub const SEARCH_BUTTON: &str = "#CPH_Body_btn_SelectFlight";

/// Step wizard rendered at the top of each flight results page
pub const RESULTS_VIEW: &str = "#pnl_page > div.page-inner.px-md-3 > div.stepwizard.mb-0.mb-md-3 > div > div";

pub const FARE_QUANTITY_SELECT: &str = "#CPH_Body_rpt_FareType_rpt_FareInfo_0_ddl_Num_0";
pub const NEXT_STEP_BUTTON: &str = "#CPH_Body_btn_NextStep";

pub const TERMS_CHECKBOX: &str = "#CPH_Body_cb_CheckTrem";

pub const NATIONALITY_FIRST_ITEM: &str = "#CPH_Body_rpt_Country_li_item_0";

pub const MOBILE_COUNTRY_BUTTON: &str = "#CPH_Body_btn_SelectNational_Mobile";
pub const MOBILE_COUNTRY_FIRST_ITEM: &str = "#CPH_Body_rpt_National_li_item_0";
pub const MOBILE_NUMBER_INPUT: &str = "#CPH_Body_tb_Contact_Mobile_Number";
pub const EMAIL_INPUT: &str = "#CPH_Body_tb_Email";

pub const PAYMENT_PANEL: &str = "#CPH_Body_pnl_updatePanel > div.page-inner.px-md-3 > div:nth-child(6)";
pub const USE_ONE_CARD_CHECKBOX: &str = "#CPH_Body_cb_UseOneCard";
pub const CARD_TYPE_SELECT: &str = "#CPH_Body_ddl_OC_CardType";
pub const CARD_NUMBER_INPUT: &str = "#CPH_Body_tb_OC_CardNo";
pub const CARD_EXPIRY_MONTH_SELECT: &str = "#CPH_Body_ddl_OC_CardExpireM";
pub const CARD_EXPIRY_YEAR_SELECT: &str = "#CPH_Body_ddl_OC_CardExpireY";
pub const CARD_CVV_INPUT: &str = "#CPH_Body_tb_OC_CardCVV";

/// Hidden marker of the listing in `slot`, carrying [`DEPARTURE_ATTRIBUTE`]
pub fn flight_listing(slot: usize) -> String {
    format!("#CPH_Body_uc_SelectFlight_rpt_Flight_btn_SelectFlightCheck_{}", slot)
}

/// Select button of the listing in `slot`
pub fn flight_select_button(slot: usize) -> String {
    format!("#CPH_Body_uc_SelectFlight_rpt_Flight_btn_SelectFlight_{}", slot)
}

/// Fields of one passenger form row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassengerFields {
    pub surname: String,
    pub given_name: String,
    pub title: String,
    pub birthday: String,
    pub birthday_hidden: String,
    pub nationality_button: String,
    pub national_id: String,
}

impl PassengerFields {
    /// Selectors for the form row at `index`
    pub fn at(index: usize) -> Self {
        let field = |name: &str| format!("#CPH_Body_rpt_PassengerList_{}_{}", name, index);
        Self {
            surname: field("tb_LastName"),
            given_name: field("tb_FirstName"),
            title: field("ddl_Title"),
            birthday: field("tb_Birthday"),
            birthday_hidden: field("hi_Birthday"),
            nationality_button: field("btn_SelectCountry"),
            national_id: field("tb_ID_NO"),
        }
    }
}

/// Script clicking an element the pointer cannot reach
pub fn click_script(selector: &str) -> String {
    format!("document.querySelector({}).click();", js_string(selector))
}

/// Quotes `value` as a JavaScript string literal
pub(crate) fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}
