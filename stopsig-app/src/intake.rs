//! Terminal intake: consent, demographics, participant id. Runs before the
//! experiment window opens; invalid input re-prompts and nothing advances
//! until every field is filled.

use std::io::{self, BufRead, Write};

use anyhow::{Result, bail};
use chrono::Utc;
use rand::Rng;
use stopsig_experiment::Demographics;
use stopsig_experiment::session::generate_participant_id;

pub struct Intake {
    pub participant_id: String,
    pub demographics: Demographics,
}

pub fn consent_given(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("i consent")
}

pub fn parse_age(input: &str) -> Option<u32> {
    input
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|age| (1..=120).contains(age))
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        bail!("input closed before intake completed");
    }
    Ok(line.trim().to_owned())
}

fn required(label: &str) -> Result<String> {
    loop {
        let value = prompt(label)?;
        if !value.is_empty() {
            return Ok(value);
        }
        println!("Please fill in all fields.");
    }
}

pub fn run_intake<R: Rng>(rng: &mut R) -> Result<Intake> {
    println!("Informed Consent Form");
    println!("Participation is voluntary and you may stop at any time.");
    loop {
        let line = prompt("Type 'I CONSENT' to participate: ")?;
        if consent_given(&line) {
            break;
        }
        println!("To continue, please type 'I CONSENT' exactly.");
    }

    let age = loop {
        let line = prompt("Age: ")?;
        match parse_age(&line) {
            Some(age) => break age,
            None => println!("Please enter a valid age."),
        }
    };
    let gender = required("Gender: ")?;
    let hand = required("Dominant hand: ")?;

    let participant_id = generate_participant_id(rng);
    println!("\nYour participant ID is {participant_id}.");
    println!("The experiment window will open now. Press SPACE to begin.");

    Ok(Intake {
        participant_id,
        demographics: Demographics {
            age,
            gender,
            hand,
            timestamp: Utc::now().to_rfc3339(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consent_requires_the_exact_phrase() {
        assert!(consent_given("I CONSENT"));
        assert!(consent_given("  i consent \n"));
        assert!(!consent_given("consent"));
        assert!(!consent_given(""));
        assert!(!consent_given("I CONSENT to everything"));
    }

    #[test]
    fn age_must_be_a_plausible_number() {
        assert_eq!(parse_age(" 34 "), Some(34));
        assert_eq!(parse_age("0"), None);
        assert_eq!(parse_age("121"), None);
        assert_eq!(parse_age("thirty"), None);
    }
}
