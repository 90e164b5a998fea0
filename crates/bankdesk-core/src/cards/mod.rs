pub mod credit_cards;
