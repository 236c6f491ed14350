use stakit::*;

fn main() -> Result<(), StakitError> {
    let mut engine = Engine::new([
        "sky_is_grey",
        "humidity_is_high",
        "wind_is_strong",
        "it_will_rain",
        "take_umbrella",
    ])?
    .named("Rainy Day Advisor");

    engine.add_rule("sky_is_grey && humidity_is_high => it_will_rain")?;
    engine.add_rule("it_will_rain => take_umbrella")?;
    engine.add_rule("wind_is_strong = !take_umbrella")?;
    engine.compile();

    println!("{}", engine);

    // grey sky and high humidity: rain, so take the umbrella
    let result = engine.predict([("sky_is_grey", true), ("humidity_is_high", true)])?;
    println!("it_will_rain:  {}", result.get_value("it_will_rain")?.as_bool().unwrap());
    println!("take_umbrella: {}", result.get_value("take_umbrella")?.as_bool().unwrap());

    // adding strong wind contradicts the umbrella rule
    let result = engine.predict([
        ("sky_is_grey", true),
        ("humidity_is_high", true),
        ("wind_is_strong", true),
    ])?;
    if result.is_contradiction() {
        println!("strong wind on a rainy day: no valid state");
    }

    // strong wind alone settles the umbrella question
    let result = engine.predict([("wind_is_strong", true)])?;
    println!("take_umbrella when windy: {}", result.get_value("take_umbrella")?);

    Ok(())
}
