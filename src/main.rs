use std::{
    error::Error,
    io::{self, BufRead},
    ops::ControlFlow,
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver, RecvTimeoutError, Sender},
    thread,
    time::Duration,
};

use chrono::Timelike;
use clap::{Parser, Subcommand};
use roosty_alarm::{
    commands::Command as ClockCommand,
    communication::{ChannelPlayer, Message},
    config::Config,
    runtime::Runtime,
    sounds::SoundLibrary,
    LocalTime, TimeSource,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// use this config file instead of the one in the config directory
    #[clap(long, short)]
    config: Option<PathBuf>,
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// write the default config file
    Init {
        #[clap(long, short)]
        force: bool,
    },
    /// list the alarm sounds
    Sounds,
    /// run the clock, reading commands from stdin (the default)
    Run,
}

fn main() -> Result<(), Box<dyn Error>> {
    // initilize the logger
    simple_file_logger::init_logger!("roosty_alarm").expect("couldn't initialize logger");

    let args = Args::parse();
    let config_path = match args.config {
        Some(path) => path,
        None => Config::config_path()?,
    };
    match args.command {
        Some(Command::Init { force }) => init(&config_path, force),
        Some(Command::Sounds) => {
            let config = Config::load_or_default(&config_path)?;
            let library = SoundLibrary::scan(config.sounds_dir()?)?;
            if library.sounds().is_empty() {
                println!("no sounds in {}", library.dir().display());
            }
            for sound in library.sounds() {
                let marker = if sound.name == config.sound { '*' } else { ' ' };
                println!("{marker} {sound}");
            }
            Ok(())
        }
        Some(Command::Run) | None => run(&config_path),
    }
}

fn init(config_path: &Path, force: bool) -> Result<(), Box<dyn Error>> {
    if config_path.exists() && !force {
        println!(
            "config already exists at {}, use --force to overwrite it",
            config_path.display()
        );
        return Ok(());
    }
    let config = Config::new();
    config.save(config_path)?;
    let sounds_dir = config.sounds_dir()?;
    std::fs::create_dir_all(&sounds_dir)?;
    log::info!("wrote default config to {}", config_path.display());
    println!(
        "wrote {}, put .wav or .mp3 files in {}",
        config_path.display(),
        sounds_dir.display()
    );
    Ok(())
}

fn run(config_path: &Path) -> Result<(), Box<dyn Error>> {
    let config = Config::load_or_default(config_path)?;
    let sounds = SoundLibrary::scan(config.sounds_dir()?)?;
    let clock = LocalTime;

    let (player_tx, player_rx) = mpsc::channel();
    let player = thread::spawn(move || play_sounds(player_rx));
    let mut runtime = Runtime::new(&config, sounds, ChannelPlayer::new(player_tx));
    runtime.add_startup_alarms(&config, clock.now());

    // stdin is read on its own thread so ticks keep coming while waiting for input
    let (command_tx, commands) = mpsc::channel();
    thread::spawn(move || read_commands(&command_tx));

    println!("type `help` for commands");
    println!("{}", runtime.countdown_label(clock.now()));
    let mut last_tick = None;
    loop {
        let now = clock.now();
        let second = now.with_nanosecond(0).unwrap_or(now);
        if last_tick != Some(second) {
            last_tick = Some(second);
            if let Some(line) = runtime.tick(second) {
                println!("{line}");
            }
        }

        // wake up at the next full second
        let wait = Duration::from_nanos(u64::from(
            1_000_000_000_u32.saturating_sub(now.nanosecond()).max(1_000_000),
        ));
        match commands.recv_timeout(wait) {
            Ok(line) if line.trim().is_empty() => {}
            Ok(line) => match line.parse::<ClockCommand>() {
                Ok(command) => match runtime.execute(command, clock.now()) {
                    ControlFlow::Continue(reply) => println!("{reply}"),
                    ControlFlow::Break(()) => break,
                },
                Err(e) => println!("{e}"),
            },
            Err(RecvTimeoutError::Timeout) => {}
            // stdin closed, keep ringing alarms without input
            Err(RecvTimeoutError::Disconnected) => thread::sleep(wait),
        }
    }

    // dropping the runtime closes the player channel
    drop(runtime);
    player
        .join()
        .map_err(|_| "sound player thread panicked".into())
}

fn read_commands(sender: &Sender<String>) {
    for line in io::stdin().lock().lines() {
        let Ok(line) = line else {
            break;
        };
        if sender.send(line).is_err() {
            break;
        }
    }
}

#[cfg(not(feature = "audio"))]
fn play_sounds(receiver: Receiver<Message>) {
    use std::io::Write;

    for message in receiver {
        match message {
            Message::AlarmTriggered { alarm_id, sound } => {
                log::info!("alarm {alarm_id} would play {}", sound.display());
                if !sound.exists() {
                    log::error!("sound file {} not found", sound.display());
                }
                // terminal bell
                print!("\x07");
                let _ = io::stdout().flush();
            }
            Message::AlarmStopped => log::info!("alarm sound stopped"),
        }
    }
}

#[cfg(feature = "audio")]
fn play_sounds(receiver: Receiver<Message>) {
    use rodio::{Sink, Source};
    use std::{fs::File, io::BufReader};

    type Looping = rodio::source::Repeat<rodio::Decoder<BufReader<File>>>;

    // create source that repeatedly plays the sound
    fn open(sound: &Path) -> Result<Looping, Box<dyn Error>> {
        let file = BufReader::new(File::open(sound)?);
        Ok(rodio::Decoder::new(file)?.repeat_infinite())
    }

    let stream = match rodio::OutputStreamBuilder::open_default_stream() {
        Ok(stream) => stream,
        Err(e) => {
            log::error!("couldn't open audio output: {e}");
            // keep draining so the clock never blocks on the channel
            for _ in receiver {}
            return;
        }
    };
    let mut sink: Option<Sink> = None;
    for message in receiver {
        if let Some(playing) = sink.take() {
            playing.stop();
        }
        match message {
            Message::AlarmTriggered { alarm_id, sound } => match open(&sound) {
                Ok(source) => {
                    log::info!("alarm {alarm_id} playing {}", sound.display());
                    let new_sink = Sink::connect_new(stream.mixer());
                    new_sink.append(source);
                    new_sink.play();
                    sink = Some(new_sink);
                }
                Err(e) => log::error!("couldn't play {}: {e}", sound.display()),
            },
            Message::AlarmStopped => log::info!("alarm sound stopped"),
        }
    }
}
