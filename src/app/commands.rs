use crate::config::{
    AppConfig, Command, CreateUser, LocalStorage, ProfileArgs, ReservationCommand,
    SnapshotCommand, UserCommand, ZoneArgs, ZoneCommand,
};
use crate::core::report::export_reports;
use crate::core::{ConfigProvider, Entry, ParkService, Persistence, SnapshotScope};
use crate::domain::invoice::Invoice;
use crate::domain::user::{
    Corporate, Employee, Frequent, International, Residential, TaskAssignment, User, UserKind,
    UserProfile,
};
use crate::domain::zone::Zone;
use crate::utils::error::{ParkError, Result};

/// Text to print and whether the working snapshot must be saved afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub message: String,
    pub mutated: bool,
}

impl CommandOutput {
    fn read(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            mutated: false,
        }
    }

    fn changed(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            mutated: true,
        }
    }
}

fn profile(args: ProfileArgs) -> UserProfile {
    UserProfile::new(args.id, args.name, args.email, args.phone, args.admin)
}

fn build_user(request: CreateUser) -> Result<User> {
    let user = match request {
        CreateUser::Residential { profile: p, events } => User::new(
            profile(p),
            UserKind::Residential(Residential {
                remaining_events: events,
            }),
        ),
        CreateUser::Corporate {
            profile: p,
            company,
            events_organized,
        } => User::new(
            profile(p),
            UserKind::Corporate(Corporate {
                company,
                events_organized,
            }),
        ),
        CreateUser::Frequent {
            profile: p,
            visits,
            discount,
        } => User::new(
            profile(p),
            UserKind::Frequent(Frequent {
                total_visits: visits,
                discount_percent: discount,
            }),
        ),
        CreateUser::International {
            profile: p,
            company,
            events_organized,
            country,
            translator,
            rate,
        } => {
            let corporate = Corporate {
                company,
                events_organized,
            };
            User::new(
                profile(p),
                UserKind::International(International::new(corporate, country, translator, rate)?),
            )
        }
        CreateUser::Employee {
            profile: p,
            role,
            salary,
        } => User::new(profile(p), UserKind::Employee(Employee::new(role, salary))),
    };
    Ok(user)
}

fn zone(args: ZoneArgs) -> Zone {
    Zone::new(args.id, args.name, args.kind, args.rate)
}

fn listing(lines: impl Iterator<Item = String>, empty: &str) -> String {
    let lines: Vec<String> = lines.collect();
    if lines.is_empty() {
        return empty.to_string();
    }
    lines.join("\n")
}

fn with_user<R>(
    service: &mut ParkService,
    id: &str,
    change: impl FnOnce(&mut User) -> Result<R>,
) -> Result<R> {
    service
        .modify(id, change)
        .ok_or_else(|| ParkError::not_found("User", id))?
}

fn wrong_kind(id: &str, actual: &str, expected: &str) -> ParkError {
    ParkError::invalid_value(
        "user",
        id,
        format!("is a {} user, expected {}", actual, expected),
    )
}

fn user_command(command: UserCommand, service: &mut ParkService) -> Result<CommandOutput> {
    match command {
        UserCommand::Create(request) => {
            service.create(build_user(request)?);
            Ok(CommandOutput::changed("User created."))
        }
        UserCommand::Show { id } => Ok(CommandOutput::read(
            service
                .read(&id)
                .map(User::summary)
                .unwrap_or_else(|| "User not found.".to_string()),
        )),
        UserCommand::Rename { id, name } => {
            let Some(mut user) = service.read(&id).cloned() else {
                return Ok(CommandOutput::read("User not found."));
            };
            user.profile.name = name;
            match service.update(user, &id) {
                Some(_) => Ok(CommandOutput::changed("User updated.")),
                None => Ok(CommandOutput::read("User not found.")),
            }
        }
        UserCommand::Delete { id } => Ok(match service.delete(&id) {
            Some(user) => CommandOutput::changed(format!("Deleted: {}", user.summary())),
            None => CommandOutput::read("User not found."),
        }),
        UserCommand::List => Ok(CommandOutput::read(listing(
            service.users().iter().map(User::summary),
            "No users.",
        ))),
        UserCommand::Visit { id } => with_user(service, &id, |user| {
            let label = user.kind.label();
            let UserKind::Frequent(frequent) = &mut user.kind else {
                return Err(wrong_kind(&id, label, "frequent"));
            };
            frequent.register_visit();
            Ok(CommandOutput::changed(format!(
                "Visit registered: {} visits, {}% discount",
                frequent.total_visits, frequent.discount_percent
            )))
        }),
        UserCommand::RegisterEvent { id } => with_user(service, &id, |user| {
            let label = user.kind.label();
            let corporate = user
                .corporate_mut()
                .ok_or_else(|| wrong_kind(&id, label, "corporate"))?;
            corporate.register_event();
            Ok(CommandOutput::changed(format!(
                "Event registered: {} events organized",
                corporate.events_organized
            )))
        }),
        UserCommand::AssignTask { id, task } => with_user(service, &id, |user| {
            let label = user.kind.label();
            let UserKind::Employee(employee) = &mut user.kind else {
                return Err(wrong_kind(&id, label, "employee"));
            };
            let outcome = employee.assign_task(task);
            Ok(CommandOutput {
                mutated: matches!(outcome, TaskAssignment::Assigned(_)),
                message: outcome.to_string(),
            })
        }),
        UserCommand::EventCost {
            id,
            attendees,
            base_rate,
        } => {
            let user = service
                .read(&id)
                .ok_or_else(|| ParkError::not_found("User", &id))?;
            let cost = match &user.kind {
                UserKind::International(intl) => intl.global_event_cost(attendees),
                UserKind::Corporate(corporate) => corporate.event_cost(base_rate, attendees),
                other => return Err(wrong_kind(&id, other.label(), "corporate")),
            };
            Ok(CommandOutput::read(format!("Event cost: {:.2}", cost)))
        }
    }
}

fn zone_command(command: ZoneCommand, service: &mut ParkService) -> Result<CommandOutput> {
    Ok(match command {
        ZoneCommand::Create(args) => {
            service.create_zone(zone(args));
            CommandOutput::changed("Zone created.")
        }
        ZoneCommand::Show { id } => CommandOutput::read(
            service
                .read_zone(&id)
                .map(Zone::to_string)
                .unwrap_or_else(|| "Zone not found.".to_string()),
        ),
        ZoneCommand::Update(args) => {
            let id = args.id.clone();
            match service.update_zone(zone(args), &id) {
                Some(_) => CommandOutput::changed("Zone updated."),
                None => CommandOutput::read("Zone not found."),
            }
        }
        ZoneCommand::Delete { id } => match service.delete_zone(&id) {
            Some(zone) => CommandOutput::changed(format!("Deleted: {}", zone)),
            None => CommandOutput::read("Zone not found."),
        },
        ZoneCommand::List => CommandOutput::read(listing(
            service.zones().iter().map(Zone::to_string),
            "No zones.",
        )),
    })
}

fn reservation_command(
    command: ReservationCommand,
    service: &mut ParkService,
) -> Result<CommandOutput> {
    match command {
        ReservationCommand::Create {
            id,
            user,
            zone,
            start,
            end,
        } => {
            let cost = service.reserve(&id, &user, &zone, start, end)?.cost();
            Ok(CommandOutput::changed(format!(
                "Reservation created with cost {:.2}.",
                cost
            )))
        }
        ReservationCommand::Show { id } => Ok(CommandOutput::read(
            service
                .reservation_details(&id)
                .unwrap_or_else(|| "Reservation not found.".to_string()),
        )),
        ReservationCommand::Delete { id } => Ok(match service.delete_reservation(&id) {
            Some(_) => CommandOutput::changed("Reservation deleted."),
            None => CommandOutput::read("Reservation not found."),
        }),
        ReservationCommand::List => {
            let lines = service
                .reservations()
                .iter()
                .filter_map(|r| service.reservation_details(r.id()));
            Ok(CommandOutput::read(listing(lines, "No reservations.")))
        }
        ReservationCommand::Book { id } => {
            let outcome = service.book(&id)?;
            Ok(CommandOutput::changed(outcome.to_string()))
        }
        ReservationCommand::Cancel { id } => {
            service.cancel(&id)?;
            Ok(CommandOutput::changed("Reservation cancelled."))
        }
    }
}

/// Runs one command against the working collections.
pub async fn execute<P: Persistence>(
    command: Command,
    service: &mut ParkService,
    store: &P,
    config: &AppConfig,
) -> Result<CommandOutput> {
    match command {
        Command::User(command) => user_command(command, service),
        Command::Zone(command) => zone_command(command, service),
        Command::Reservation(command) => reservation_command(command, service),
        Command::Snapshot(SnapshotCommand::Save { scope, file }) => {
            let name = file.unwrap_or_else(|| config.snapshot_file().to_string());
            let scope = SnapshotScope::from(scope);
            // Startup reads the working file with every block.
            if scope != SnapshotScope::All && name == config.snapshot_file() {
                return Err(ParkError::invalid_value(
                    "file",
                    &name,
                    "A partial snapshot cannot replace the working snapshot; pass --file",
                ));
            }
            store.save(service, scope, &name).await?;
            Ok(CommandOutput::read(format!("Snapshot written to {}.", name)))
        }
        Command::Snapshot(SnapshotCommand::Load { scope, file }) => {
            let name = file.unwrap_or_else(|| config.snapshot_file().to_string());
            store.load(service, scope.into(), &name).await?;
            Ok(CommandOutput::changed(format!("Snapshot loaded from {}.", name)))
        }
        Command::Export => {
            let storage = LocalStorage::new(config.export_dir());
            let written = export_reports(&storage, service).await?;
            let counts = service.read_all().iter().fold((0, 0, 0), |acc, entry| match entry {
                Entry::User(_) => (acc.0 + 1, acc.1, acc.2),
                Entry::Zone(_) => (acc.0, acc.1 + 1, acc.2),
                Entry::Reservation(_) => (acc.0, acc.1, acc.2 + 1),
            });
            Ok(CommandOutput::read(format!(
                "Exported {} users, {} zones, {} reservations to {} ({})",
                counts.0,
                counts.1,
                counts.2,
                config.export_dir(),
                written.join(", ")
            )))
        }
        Command::Invoice {
            amount,
            discount,
            tax,
        } => {
            let mut invoice = Invoice::new(amount);
            invoice.apply_discount(discount);
            Ok(CommandOutput::read(format!(
                "{}, total with tax: {:.2}",
                invoice,
                invoice.total_with_tax(tax)
            )))
        }
    }
}
