use chrono::{Local, NaiveTime};

pub fn greeting(time: NaiveTime) -> String {
    format!("{} - hello world", time.format("%H:%M:%S%.3f"))
}

pub fn greeting_now() -> String {
    greeting(Local::now().time())
}
