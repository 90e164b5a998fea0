pub mod price_alert;
