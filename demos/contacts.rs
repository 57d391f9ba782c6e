//! Decode a small contact list with a validation hook and keep-last deduplication

use rowcast_core::{ColumnSpec, CsvEngine, KeepPolicy, Record, Rejection, Schema};
use std::io::Cursor;

#[derive(Debug, Default, Clone)]
struct Contact {
    first_name: String,
    last_name: String,
    address: String,
    city: String,
    state: String,
    zip: String,
    married: bool,
}

impl Record for Contact {
    fn schema() -> Schema<Self> {
        Schema::new()
            .column(
                ColumnSpec::new("first_name").allow_null().with_length(0, 20),
                |c: &mut Contact, v: String| c.first_name = v,
            )
            .column(
                ColumnSpec::new("last_name").allow_null().with_length(0, 20),
                |c: &mut Contact, v: String| c.last_name = v,
            )
            .column(
                ColumnSpec::new("address").allow_null().with_max_length(30),
                |c: &mut Contact, v: String| c.address = v,
            )
            .column(ColumnSpec::new("city").allow_null(), |c: &mut Contact, v: String| {
                c.city = v
            })
            .column(
                ColumnSpec::new("state").allow_null().with_length(2, 2),
                |c: &mut Contact, v: String| c.state = v,
            )
            .column(
                ColumnSpec::new("zip").allow_null().with_length(5, 9),
                |c: &mut Contact, v: String| c.zip = v,
            )
            .column(
                ColumnSpec::new("married")
                    .allow_null()
                    .with_true_values(["Y", "yes", "y"]),
                |c: &mut Contact, v: bool| c.married = v,
            )
    }
}

const CONTACTS: &str = "\
first_name,last_name,address,city,state,zip,married
John,Smith,12 Main Street,Springfield,IL,62701,Y
Jane,Doe,4 Elm Street,Shelbyville,IL,62565,yes
Mary,Jones,800 A Very Long Boulevard Name Apt 12,Ogdenville,IL,62702,n

Pete,Smith,77 Oak Lane,Springfield,IL,62704,y
Alan,Brown,9 Pine Road,North Haverbrook,ILL,627,N
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Rowcast Contacts Example\n");

    let engine = CsvEngine::<Contact>::for_record().with_validator(|c: &Contact| {
        if c.last_name.eq_ignore_ascii_case("doe") {
            return Err(Rejection::new(format!(
                "Cannot use the last_name [{}]",
                c.last_name.to_uppercase()
            )));
        }
        Ok(())
    });

    let decoded = engine.decode_unique(
        Cursor::new(CONTACTS),
        |c| c.last_name.clone(),
        KeepPolicy::Last,
    )?;

    for contact in &decoded.records {
        println!(
            "{} {} ({}, {} {}) married: {}",
            contact.first_name,
            contact.last_name,
            contact.city,
            contact.state,
            contact.zip,
            contact.married
        );
    }

    println!(
        "\nOut of {} records only {} could be processed.",
        decoded.total_rows(),
        decoded.records.len()
    );
    for message in decoded.error_messages() {
        println!("{}", message);
    }

    Ok(())
}
