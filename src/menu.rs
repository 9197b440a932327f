//! Interactive text menu over a [`RecordStore`]
//!
//! Reads from any `BufRead` and writes to any `Write`, so sessions can be
//! scripted in tests. Invalid numbers are reported and asked for again; store
//! errors are reported and the menu keeps running. End of input exits.

use crate::error::{Result, StoreError};
use crate::record::Vehicle;
use crate::store::{Outcome, RecordStore};
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing::warn;

const OPTIONS: &str = "
Select an option:
1. List all records
2. Add a new record
3. Change horsepower (by ID)
4. Delete a record (by ID)
5. Exit";

enum Flow {
    Continue,
    Exit,
}

pub struct Menu<'a, R, W> {
    store: &'a RecordStore,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(store: &'a RecordStore, input: R, output: W) -> Self {
        Menu {
            store,
            input,
            output,
        }
    }

    /// Run until the user exits or input ends
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.say(OPTIONS)?;
            let Some(choice) = self.ask_number::<u32>("> ")? else {
                return Ok(());
            };
            let flow = match choice {
                1 => self.list()?,
                2 => self.append()?,
                3 => self.update()?,
                4 => self.delete()?,
                5 => Flow::Exit,
                _ => {
                    self.say("Invalid option. Please choose 1 to 5.")?;
                    Flow::Continue
                }
            };
            if let Flow::Exit = flow {
                return Ok(());
            }
        }
    }

    fn list(&mut self) -> Result<Flow> {
        if let Err(e) = self.store.list_to(&mut self.output) {
            self.report(e)?;
        }
        Ok(Flow::Continue)
    }

    fn append(&mut self) -> Result<Flow> {
        self.say("Add vehicle")?;
        let Some(id) = self.ask_number::<i32>("ID: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(model) = self.ask_line("Model: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(make) = self.ask_line("Make: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(fuel_consumption) = self.ask_number::<f64>("Fuel consumption: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(horsepower) = self.ask_number::<i32>("Horsepower: ")? else {
            return Ok(Flow::Exit);
        };

        let vehicle = Vehicle {
            id,
            model,
            make,
            fuel_consumption,
            horsepower,
        };
        match self.store.append(&vehicle) {
            Ok(appended) => {
                for field in &appended.truncated {
                    self.say(format!("Warning: {} was truncated to fit", field))?;
                }
                self.say(format!(
                    "Vehicle {} '{}' added.",
                    vehicle.make, vehicle.model
                ))?;
            }
            Err(e) => self.report(e)?,
        }
        Ok(Flow::Continue)
    }

    fn update(&mut self) -> Result<Flow> {
        let Some(id) = self.ask_number::<i32>("ID of the vehicle to change: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(horsepower) = self.ask_number::<i32>("New horsepower: ")? else {
            return Ok(Flow::Exit);
        };

        match self.store.update_horsepower(id, horsepower) {
            Ok(Outcome::Applied { .. }) => self.say(format!(
                "Horsepower of vehicle {} changed to {}",
                id, horsepower
            ))?,
            Ok(Outcome::NotFound) => self.say(format!("No vehicle found with ID {}", id))?,
            Err(e) => self.report(e)?,
        }
        Ok(Flow::Continue)
    }

    fn delete(&mut self) -> Result<Flow> {
        let Some(id) = self.ask_number::<i32>("ID of the vehicle to delete: ")? else {
            return Ok(Flow::Exit);
        };

        match self.store.delete(id) {
            Ok(Outcome::Applied { .. }) => self.say(format!("Vehicle {} deleted.", id))?,
            Ok(Outcome::NotFound) => self.say(format!("No vehicle found with ID {}", id))?,
            Err(e) => self.report(e)?,
        }
        Ok(Flow::Continue)
    }

    fn say(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.output, "{}", text).map_err(StoreError::Console)
    }

    fn report(&mut self, error: StoreError) -> Result<()> {
        warn!("Menu operation failed: {}", error);
        self.say(format!("Error: {}", error))
    }

    /// Prompt for one line; `None` at end of input
    fn ask_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt).map_err(StoreError::Console)?;
        self.output.flush().map_err(StoreError::Console)?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(StoreError::Console)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Prompt until the line parses as a number; `None` at end of input
    fn ask_number<T: FromStr>(&mut self, prompt: &str) -> Result<Option<T>> {
        loop {
            let Some(line) = self.ask_line(prompt)? else {
                return Ok(None);
            };
            match line.trim().parse() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => self.say(format!("Error: '{}' is not a valid number.", line.trim()))?,
            }
        }
    }
}
