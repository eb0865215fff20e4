// Two security tiers: public token acquisition, then everything else
// behind the auth gate.
pub mod protected;
pub mod public;
