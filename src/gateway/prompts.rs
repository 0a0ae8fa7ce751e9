//! Prompt templates for each gateway operation

use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::json;

use crate::error::GatewayError;
use crate::llm::ChatMessage;
use crate::world::{ObjectInteraction, World, WorldObject};

/// Example world shown to the world model; also what a well-behaved model
/// returns for "a lumberjack game".
pub const EXAMPLE_WORLD: &str = r#"{"objects": [{"name": "tree", "metadata": {"color": "green"}}, {"name": "player", "metadata": {"has_axe": false}}, {"name": "game_state", "metadata": {"has_won": false, "description": "You are a lumberjack. You must cut down the tree."}}]}"#;

const EXAMPLE_INTERACTION: &str =
    r#"{"name": "eat", "display_name": "Eat", "arguments": ["What do you want to eat?"]}"#;

static EXAMPLE_INTERACTION_EFFECTS: Lazy<String> = Lazy::new(|| {
    json!({
        "delete_objects": [{"name": "stick"}, {"name": "rock"}],
        "create_objects": [{"name": "axe", "metadata": {"color": "brown"}}],
        "overwrite_metadata": [{"name": "player", "metadata": {"has_crafted": true}}],
        "display_messages": [{"message": "Congrats!"}],
    })
    .to_string()
});

static EXAMPLE_TICK_EFFECTS: Lazy<String> = Lazy::new(|| {
    json!({
        "delete_objects": [{"name": "seed"}],
        "create_objects": [{"name": "plant", "metadata": {"growth": "1"}}],
        "overwrite_metadata": [{"name": "calendar", "metadata": {"month": "february"}}],
        "display_messages": [{"message": "Your plant grew!"}],
    })
    .to_string()
});

static WORLD_MODEL_SYSTEM: Lazy<String> = Lazy::new(|| {
    format!(
        "You are WorldModelAI. Your purpose is to model the game world as accurately as \
         possible. The world is represented as a JSON object that describes an environment \
         or scene. Objects do not have a position. The player must be an object of the \
         world. There must also be a game_state object that holds core variables for the \
         game loop. The game_state object must also have a small description of the game \
         and the player's goal or win conditions. Here is an example world:{}\n\
         The name of each object must be unique. The metadata can be any JSON object. \
         Only output the JSON object.",
        EXAMPLE_WORLD
    )
});

const RENDERER_SYSTEM: &str = "You are WebGameRendererAI. Your purpose is to render world \
    objects as HTML for a web game. These renders must be simple but charming and must \
    represent the state of the object. Note that there are some metadata fields that should \
    not be rendered. For example, you must not show the age of an NPC that the player has \
    not met yet. The object must be rendered as an HTML div and can use Tailwind css \
    classes. They can use the style attribute for css and hardcoded svg or such.\n\
    Feel free to make your renders detailed, colorful, and artistic. Only output the HTML. \
    Do not use images or other external assets. You must not use position: absolute, \
    position: fixed css. This is because the game engine will position the objects for \
    you. Do not use width and height if your object contains text because it might bleed. \
    Note that we use a dark theme. Only output the HTML.";

static GAME_MASTER_SYSTEM: Lazy<String> = Lazy::new(|| {
    format!(
        "You are GameMasterAI. Your purpose is to generate interactions between the player \
         and objects in the world. These interactions must be simple but entertaining and \
         must be accurate to the expectations of the player. The interactions must be \
         represented as a JSON list where each element is an object with a name, a \
         display_name, and arguments. The name is a unique identifier for the interaction \
         and the display_name is what the player sees. Interactions also have arguments, \
         which are a list of questions that the player must answer to complete the \
         interaction. Here is an example interaction:{}",
        EXAMPLE_INTERACTION
    )
});

static INTERACTION_ENGINE_SYSTEM: Lazy<String> = Lazy::new(|| {
    format!(
        "You are GameEngineAI. Your purpose is to execute interactions between the player \
         and objects in the world. The world, object, and interaction are provided as JSON. \
         You must return an object of effects that the interaction had on the world. You can \
         use the game_state object metadata to set global variables that track the game \
         progress. Only output the JSON. You can set metadata values to None to delete them. \
         Here is an example result that uses all possible effects: \n{}\n\
         You should prioritize creating and deleting objects as this is more fun for the \
         player. You should also challenge the player by having certain interactions fail. \
         For example, if the player tries to eat a rock, you should show a message that says \
         'You can't eat a rock!'. Some interactions should also fail randomly, to represent \
         a sense of difficulty. For example a cauldron might explode even if the player \
         correctly follows the recipe for a potion. You must not abuse display_messages by \
         using it to display things that didn't happen. For example, you can't say 'The \
         monster died!' if you don't also use delete_objects to delete the monster. You must \
         add new metadata and new objects as the player discovers new things. For example, \
         if the player asks for the name of an NPC, you should add a new metadata field to \
         the NPC object that stores the name. This is important, as otherwise you won't be \
         able to remember the name of the NPC later. You must also make sure to clean up \
         objects that are no longer needed. For example, if this is a game about fixing cars \
         and a car has already been fixed, you should delete the broken car object.",
        *EXAMPLE_INTERACTION_EFFECTS
    )
});

static TICK_ENGINE_SYSTEM: Lazy<String> = Lazy::new(|| {
    format!(
        "You are GameEngineAI. Your purpose is to compute a game world tick. The world is \
         provided as JSON. You must return a JSON object of effects that the tick had on the \
         world. You can use the game_state object metadata to update global variables that \
         track the game progress. Only output the JSON. You can set metadata values to None \
         to delete them. Here is an example result that uses all possible effects: \n{}\n\
         During the game tick, the world gets updated without any player input. You should \
         update the world to reflect the change of time. For example, you can make plants \
         grow, or make the player hungry, or make enemies attack the player, make loyalties \
         change, etc. You should also challenge the player by having new challenges and \
         enemies appear. For example, you can show a new quest, or a new enemy, or a new \
         friendly NPC. Do not perform any actions that require player input. For example, if \
         there is a tree that the player can cut down, you should not cut down the tree \
         during the game tick. Instead, you should make the tree grow older or something \
         like that. You must not abuse display_messages by using it to display things that \
         didn't happen. For example, you can't say 'The monster attacks you!' if you don't \
         also use overwrite_metadata to change the player's health. You also can't say \
         something like 'Helena is in her room' if there is no metadata that backs this up. \
         You must also make sure to clean up objects that are no longer needed. For example, \
         if this is a game about fixing cars and a car has already been fixed, you should \
         delete the broken car object.",
        *EXAMPLE_TICK_EFFECTS
    )
});

fn to_json<T: Serialize>(value: &T) -> Result<String, GatewayError> {
    serde_json::to_string(value).map_err(|e| GatewayError::Prompt(e.to_string()))
}

fn world_context(world: &World) -> Result<ChatMessage, GatewayError> {
    Ok(ChatMessage::user(format!("World context: {}", to_json(world)?)))
}

/// Messages asking the model to build a world from a description
pub fn generate_world(description: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(WORLD_MODEL_SYSTEM.as_str()),
        ChatMessage::user(description),
    ]
}

/// Messages asking the model to render one object as HTML
pub fn render_object(world: &World, object: &WorldObject) -> Result<Vec<ChatMessage>, GatewayError> {
    Ok(vec![
        world_context(world)?,
        ChatMessage::system(RENDERER_SYSTEM),
        ChatMessage::user(format!("Render this object now: {}", to_json(object)?)),
    ])
}

/// Messages asking the model which interactions an object offers
pub fn list_interactions(
    world: &World,
    object: &WorldObject,
) -> Result<Vec<ChatMessage>, GatewayError> {
    Ok(vec![
        ChatMessage::system(GAME_MASTER_SYSTEM.as_str()),
        world_context(world)?,
        ChatMessage::user(format!(
            "Return JSON interactions for object: {}",
            to_json(object)?
        )),
    ])
}

/// Messages asking the model for the effects of an interaction
pub fn apply_interaction(
    world: &World,
    object: &WorldObject,
    interaction: &ObjectInteraction,
) -> Result<Vec<ChatMessage>, GatewayError> {
    Ok(vec![
        world_context(world)?,
        ChatMessage::system(INTERACTION_ENGINE_SYSTEM.as_str()),
        ChatMessage::user(format!("Object context: {}", to_json(object)?)),
        ChatMessage::user(format!(
            "Please return JSON effects for this interaction: {}",
            to_json(interaction)?
        )),
    ])
}

/// Messages asking the model for the effects of one game tick
pub fn advance_tick(world: &World) -> Result<Vec<ChatMessage>, GatewayError> {
    Ok(vec![
        world_context(world)?,
        ChatMessage::system(TICK_ENGINE_SYSTEM.as_str()),
        ChatMessage::user("Please return JSON effects for this game tick now:"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;
    use crate::world::Effects;

    #[test]
    fn test_examples_are_valid_payloads() {
        let world: World = serde_json::from_str(EXAMPLE_WORLD).unwrap();
        assert_eq!(world.objects.len(), 3);

        let interaction: ObjectInteraction = serde_json::from_str(EXAMPLE_INTERACTION).unwrap();
        assert_eq!(interaction.name, "eat");

        let effects: Effects = serde_json::from_str(&EXAMPLE_INTERACTION_EFFECTS).unwrap();
        assert_eq!(effects.delete_objects.unwrap().len(), 2);
        let effects: Effects = serde_json::from_str(&EXAMPLE_TICK_EFFECTS).unwrap();
        assert_eq!(effects.messages().collect::<Vec<_>>(), vec!["Your plant grew!"]);
    }

    #[test]
    fn test_generate_world_messages() {
        let messages = generate_world("a lumberjack game");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains(EXAMPLE_WORLD));
        assert_eq!(messages[1], ChatMessage::user("a lumberjack game"));
    }

    #[test]
    fn test_interaction_messages_embed_state() {
        let world: World = serde_json::from_str(EXAMPLE_WORLD).unwrap();
        let tree = world.object("tree").unwrap().clone();
        let chop = ObjectInteraction {
            name: "chop".to_string(),
            display_name: "Chop".to_string(),
            arguments: None,
        };

        let messages = apply_interaction(&world, &tree, &chop).unwrap();
        let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::System, Role::User, Role::User]);
        assert!(messages[0].content.starts_with("World context: {\"objects\":"));
        assert!(messages[1].content.contains("\"axe\""));
        assert_eq!(
            messages[3].content,
            "Please return JSON effects for this interaction: \
             {\"name\":\"chop\",\"display_name\":\"Chop\",\"arguments\":null}"
        );
    }

    #[test]
    fn test_tick_and_render_messages() {
        let world: World = serde_json::from_str(EXAMPLE_WORLD).unwrap();

        let tick = advance_tick(&world).unwrap();
        assert_eq!(tick.len(), 3);
        assert!(tick[1].content.contains("\"calendar\""));

        let player = world.player().unwrap();
        let render = render_object(&world, player).unwrap();
        assert_eq!(render[1].role, Role::System);
        assert!(render[2].content.starts_with("Render this object now: {\"name\":\"player\""));

        let list = list_interactions(&world, player).unwrap();
        assert_eq!(list[0].role, Role::System);
        assert!(list[2].content.starts_with("Return JSON interactions for object:"));
    }
}
