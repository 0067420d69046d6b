use crate::core::desk::BookingDesk;
use crate::domain::model::{Availability, BookingRecord, Passenger, Reference, SeatId};
use crate::domain::ports::RecordStore;
use crate::utils::error::{BookingError, Result};
use crate::utils::validation::Validate;
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

const MENU: &str = "\
Menu:
1. Check availability of seat
2. Book a seat
3. Free a seat
4. Modify booking
5. Cancel a booking by reference
6. Show your booking
7. Show seating chart
8. Export seating chart to CSV
9. Exit program
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Check,
    Book,
    Free,
    Modify,
    Cancel,
    Find,
    ShowChart,
    Export,
    Exit,
}

impl FromStr for MenuChoice {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "1" => Ok(MenuChoice::Check),
            "2" => Ok(MenuChoice::Book),
            "3" => Ok(MenuChoice::Free),
            "4" => Ok(MenuChoice::Modify),
            "5" => Ok(MenuChoice::Cancel),
            "6" => Ok(MenuChoice::Find),
            "7" => Ok(MenuChoice::ShowChart),
            "8" => Ok(MenuChoice::Export),
            "9" => Ok(MenuChoice::Exit),
            other => Err(BookingError::ValidationError {
                message: format!("Invalid choice '{}'. Please select an option from 1 to 9.", other),
            }),
        }
    }
}

/// Interactive text menu over a booking desk.
pub struct Session<S: RecordStore, R, W> {
    desk: BookingDesk<S>,
    input: R,
    output: W,
    collect_passenger_details: bool,
}

impl<S, R, W> Session<S, R, W>
where
    S: RecordStore,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(desk: BookingDesk<S>, input: R, output: W, collect_passenger_details: bool) -> Self {
        Self {
            desk,
            input,
            output,
            collect_passenger_details,
        }
    }

    /// Runs until the user exits or input ends, then hands the desk back.
    pub async fn run(mut self) -> Result<BookingDesk<S>> {
        self.say("Welcome to the Seat Booking Desk!\n").await?;

        loop {
            self.say(MENU).await?;
            let Some(line) = self.prompt("Please enter your choice (1-9): ").await? else {
                break;
            };
            let choice = match line.parse::<MenuChoice>() {
                Ok(choice) => choice,
                Err(e) => {
                    self.say(&format!("{}\n", e.user_friendly_message())).await?;
                    continue;
                }
            };
            if choice == MenuChoice::Exit {
                self.say("Thank you for using the Seat Booking Desk. Goodbye!\n")
                    .await?;
                break;
            }

            tracing::debug!("Menu choice: {:?}", choice);
            match self.dispatch(choice).await {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => self.report(&e).await?,
            }
        }

        self.output.flush().await?;
        Ok(self.desk)
    }

    /// Returns `Ok(false)` when input ended mid-dialogue.
    async fn dispatch(&mut self, choice: MenuChoice) -> Result<bool> {
        match choice {
            MenuChoice::Check => {
                self.show_chart().await?;
                let Some(seat) = self.ask_seat("Enter the seat ID to check (e.g., 2B): ").await? else {
                    return Ok(false);
                };
                let message = match self.desk.check(&seat)? {
                    Availability::Available => format!("Seat {} is available for booking.", seat),
                    Availability::Booked => format!("Seat {} is already booked.", seat),
                    Availability::Aisle => format!("Seat {} is an aisle and is not bookable.", seat),
                    Availability::Storage => {
                        format!("Seat {} is a storage area and is not bookable.", seat)
                    }
                };
                self.say(&format!("{}\n", message)).await?;
            }
            MenuChoice::Book => {
                let passenger = if self.collect_passenger_details {
                    match self.ask_passenger().await? {
                        Some(passenger) => Some(passenger),
                        None => return Ok(false),
                    }
                } else {
                    None
                };
                let Some(seat) = self.ask_seat("Enter the seat ID to book (e.g., 12A): ").await? else {
                    return Ok(false);
                };
                let confirmation = self.desk.book(&seat, passenger).await?;
                self.say(&format!(
                    "Seat {} has been successfully booked with reference {}.\n",
                    confirmation.seat, confirmation.reference
                ))
                .await?;
            }
            MenuChoice::Free => {
                let Some(seat) = self.ask_seat("Enter the seat ID to free (e.g., 2B): ").await? else {
                    return Ok(false);
                };
                self.desk.free(&seat).await?;
                self.say(&format!("Seat {} has been freed and is now available.\n", seat))
                    .await?;
            }
            MenuChoice::Modify => {
                let Some(current) = self
                    .prompt("Enter your current booked seat ID (e.g., 2B): ")
                    .await?
                else {
                    return Ok(false);
                };
                let Some(target) = self
                    .prompt("Enter the new seat ID you want (e.g., 3A): ")
                    .await?
                else {
                    return Ok(false);
                };
                let (current, target) = match (parse_seat(&current), parse_seat(&target)) {
                    (Ok(c), Ok(t)) => (c, t),
                    _ => {
                        return Err(BookingError::SeatsUnknown {
                            current: current.trim().to_string(),
                            target: target.trim().to_string(),
                        })
                    }
                };
                let confirmation = self.desk.modify(&current, &target).await?;
                self.say(&format!(
                    "Booking modified: changed from {} to {} with new reference {}.\n",
                    current, confirmation.seat, confirmation.reference
                ))
                .await?;
            }
            MenuChoice::Cancel => {
                let Some(text) = self.prompt("Enter booking reference to cancel: ").await? else {
                    return Ok(false);
                };
                let reference = Reference::parse(&text.trim().to_uppercase())?;
                let seat = self.desk.cancel(&reference).await?;
                self.say(&format!("Booking for seat {} has been canceled.\n", seat))
                    .await?;
            }
            MenuChoice::Find => {
                let Some(query) = self
                    .prompt("Enter your booking reference, passport number, or full name: ")
                    .await?
                else {
                    return Ok(false);
                };
                match self.desk.find(&query).await? {
                    Some(record) => self.say(&describe(&record)).await?,
                    None => {
                        self.say("No booking found with that information.\n")
                            .await?
                    }
                }
            }
            MenuChoice::ShowChart => self.show_chart().await?,
            MenuChoice::Export => {
                let Some(path) = self.prompt("Enter the CSV file path: ").await? else {
                    return Ok(false);
                };
                let path = path.trim().to_string();
                crate::utils::validation::validate_non_empty_string("File path", &path)?;
                self.desk.export_csv(&path).await?;
                self.say(&format!("Seating chart exported to {}.\n", path))
                    .await?;
            }
            MenuChoice::Exit => return Ok(false),
        }
        Ok(true)
    }

    async fn show_chart(&mut self) -> Result<()> {
        let view = self.desk.render();
        let legend = self.desk.render_options().legend();
        let occupancy = self.desk.occupancy();
        self.say(&format!(
            "\nSeating chart ({}):\n{}Booked: {}  Free: {}  ({:.1}% occupied)\n\n",
            legend,
            view,
            occupancy.booked,
            occupancy.free,
            occupancy.utilization() * 100.0
        ))
        .await
    }

    async fn ask_seat(&mut self, text: &str) -> Result<Option<SeatId>> {
        match self.prompt(text).await? {
            Some(line) => parse_seat(&line).map(Some),
            None => Ok(None),
        }
    }

    async fn ask_passenger(&mut self) -> Result<Option<Passenger>> {
        let Some(first_name) = self.prompt("Enter First Name: ").await? else {
            return Ok(None);
        };
        let Some(last_name) = self.prompt("Enter Last Name: ").await? else {
            return Ok(None);
        };
        let Some(passport) = self.prompt("Enter Passport Number: ").await? else {
            return Ok(None);
        };
        let passenger = Passenger {
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            passport: passport.trim().to_uppercase(),
        };
        passenger.validate()?;
        Ok(Some(passenger))
    }

    async fn report(&mut self, error: &BookingError) -> Result<()> {
        if error.is_recoverable() {
            tracing::debug!("Request rejected: {}", error);
        } else {
            tracing::error!(
                "❌ {} (Category: {:?}, Severity: {:?})",
                error,
                error.category(),
                error.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", error.recovery_suggestion());
        }
        self.say(&format!("{}\n", error.user_friendly_message())).await
    }

    /// Prints `text` and reads one line; `None` at end of input.
    async fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        self.say(text).await?;
        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
    }

    async fn say(&mut self, text: &str) -> Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await?;
        Ok(())
    }
}

fn parse_seat(text: &str) -> Result<SeatId> {
    text.trim().to_uppercase().parse()
}

fn describe(record: &BookingRecord) -> String {
    let mut details = String::from("\nBooking Details:\n");
    if let Some(passenger) = &record.passenger {
        details.push_str(&format!("Name: {}\n", passenger.full_name()));
        details.push_str(&format!("Passport: {}\n", passenger.passport));
    }
    details.push_str(&format!("Seat: {}\n", record.seat));
    details.push_str(&format!("Booking Reference: {}\n", record.reference));
    details.push_str(&format!(
        "Booked At: {}\n",
        record.booked_at.format("%Y-%m-%d %H:%M UTC")
    ));
    details
}
