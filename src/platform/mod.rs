//! Conversions between twilight's Discord models and the bot's own types.
//!
//! Everything Discord-shaped stops here: inbound `Interaction`s become
//! [`InteractionEvent`]s, outbound [`Reply`]s become `InteractionResponse`s,
//! and [`CommandDescriptor`]s become application commands for bulk
//! registration. Handlers and the dispatcher never see twilight types.

#[cfg(feature = "io")]
mod responder;

#[cfg(feature = "io")]
pub use responder::InteractionResponder;

use twilight_model::application::command::{
    Command, CommandOption, CommandOptionType, CommandType,
};
use twilight_model::application::interaction::application_command::{
    CommandDataOption, CommandOptionValue,
};
use twilight_model::application::interaction::modal::ModalInteractionComponent;
use twilight_model::application::interaction::{Interaction, InteractionData, InteractionType};
use twilight_model::channel::message::component::{
    ActionRow, Button, ButtonStyle, Component, TextInput, TextInputStyle,
};
use twilight_model::channel::message::MessageFlags;
use twilight_model::http::interaction::{
    InteractionResponse, InteractionResponseData, InteractionResponseType,
};
use twilight_model::id::Id;

use crate::command::{CommandDescriptor, OptionSpec, OptionType};
use crate::interaction::InteractionEvent;
use crate::response::{ButtonSpec, MessageReply, ModalForm, Reply, TextField, TextFieldStyle};

// ---------------------------------------------------------------------------
// Inbound: Interaction -> InteractionEvent
// ---------------------------------------------------------------------------

/// Flatten a twilight interaction. Pings, autocomplete requests, and
/// interactions without data yield `None`.
pub fn interaction_event(interaction: &Interaction) -> Option<InteractionEvent> {
    let data = interaction.data.as_ref()?;

    let mut event = match (interaction.kind, data) {
        (InteractionType::ApplicationCommand, InteractionData::ApplicationCommand(command)) => {
            let mut event = InteractionEvent::command(command.name.clone());
            event.fields = command_fields(&command.options);
            event
        }
        (InteractionType::MessageComponent, InteractionData::MessageComponent(component)) => {
            InteractionEvent::component(component.custom_id.clone())
                .with_values(component.values.clone())
        }
        (InteractionType::ModalSubmit, InteractionData::ModalSubmit(modal)) => {
            let mut event = InteractionEvent::modal_submit(modal.custom_id.clone());
            for component in &modal.components {
                collect_text_inputs(component, &mut event);
            }
            event
        }
        _ => return None,
    };

    // Guild interactions carry the user on the member; DMs carry it directly.
    event.user_id = interaction
        .member
        .as_ref()
        .and_then(|member| member.user.as_ref())
        .or(interaction.user.as_ref())
        .map(|user| user.id.get());

    Some(event)
}

fn command_fields(options: &[CommandDataOption]) -> std::collections::BTreeMap<String, String> {
    options
        .iter()
        .filter_map(|option| Some((option.name.clone(), option_value(&option.value)?)))
        .collect()
}

/// Render a leaf option value as a string. Sub-commands and autocomplete
/// focus markers have no single value.
fn option_value(value: &CommandOptionValue) -> Option<String> {
    let rendered = match value {
        CommandOptionValue::String(s) => s.clone(),
        CommandOptionValue::Integer(i) => i.to_string(),
        CommandOptionValue::Number(n) => n.to_string(),
        CommandOptionValue::Boolean(b) => b.to_string(),
        CommandOptionValue::User(id) => id.to_string(),
        CommandOptionValue::Channel(id) => id.to_string(),
        CommandOptionValue::Role(id) => id.to_string(),
        CommandOptionValue::Mentionable(id) => id.to_string(),
        CommandOptionValue::Attachment(id) => id.to_string(),
        _ => return None,
    };
    Some(rendered)
}

fn collect_text_inputs(component: &ModalInteractionComponent, event: &mut InteractionEvent) {
    match component {
        ModalInteractionComponent::ActionRow(row) => {
            for inner in &row.components {
                collect_text_inputs(inner, event);
            }
        }
        ModalInteractionComponent::TextInput(input) => {
            event
                .fields
                .insert(input.custom_id.clone(), input.value.clone());
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Outbound: Reply -> InteractionResponse
// ---------------------------------------------------------------------------

/// Build the interaction callback body for a reply.
pub fn interaction_response(reply: &Reply) -> InteractionResponse {
    match reply {
        Reply::Message(message) => message_response(message),
        Reply::Modal(form) => modal_response(form),
    }
}

fn message_response(message: &MessageReply) -> InteractionResponse {
    let components = (!message.buttons.is_empty())
        .then(|| vec![action_row(message.buttons.iter().map(button).collect())]);

    InteractionResponse {
        kind: InteractionResponseType::ChannelMessageWithSource,
        data: Some(InteractionResponseData {
            content: Some(message.content.clone()),
            components,
            flags: message.ephemeral.then_some(MessageFlags::EPHEMERAL),
            ..Default::default()
        }),
    }
}

fn modal_response(form: &ModalForm) -> InteractionResponse {
    let rows = form
        .rows
        .iter()
        .map(|row| action_row(row.iter().map(text_input).collect()))
        .collect();

    InteractionResponse {
        kind: InteractionResponseType::Modal,
        data: Some(InteractionResponseData {
            custom_id: Some(form.custom_id.clone()),
            title: Some(form.title.clone()),
            components: Some(rows),
            ..Default::default()
        }),
    }
}

fn action_row(components: Vec<Component>) -> Component {
    Component::ActionRow(ActionRow {
        components,
        id: None,
    })
}

fn button(spec: &ButtonSpec) -> Component {
    Component::Button(Button {
        custom_id: Some(spec.custom_id.clone()),
        disabled: false,
        emoji: None,
        label: Some(spec.label.clone()),
        style: ButtonStyle::Primary,
        url: None,
        sku_id: None,
        id: None,
    })
}

fn text_input(field: &TextField) -> Component {
    let style = match field.style {
        TextFieldStyle::Short => TextInputStyle::Short,
        TextFieldStyle::Paragraph => TextInputStyle::Paragraph,
    };

    #[allow(deprecated)]
    Component::TextInput(TextInput {
        custom_id: field.custom_id.clone(),
        label: Some(field.label.clone()),
        max_length: None,
        min_length: None,
        placeholder: field.placeholder.clone(),
        required: Some(field.required),
        style,
        value: None,
        id: None,
    })
}

// ---------------------------------------------------------------------------
// Registration: CommandDescriptor -> Command
// ---------------------------------------------------------------------------

/// Build a chat-input application command for bulk registration.
#[allow(deprecated)]
pub fn application_command(descriptor: &CommandDescriptor) -> Command {
    Command {
        application_id: None,
        contexts: None,
        default_member_permissions: None,
        dm_permission: None,
        description: descriptor.description.clone(),
        description_localizations: None,
        guild_id: None,
        id: None,
        integration_types: None,
        kind: CommandType::ChatInput,
        name: descriptor.name.clone(),
        name_localizations: None,
        nsfw: None,
        options: descriptor.options.iter().map(command_option).collect(),
        version: Id::new(1),
    }
}

fn command_option(spec: &OptionSpec) -> CommandOption {
    CommandOption {
        autocomplete: None,
        channel_types: None,
        choices: None,
        description: spec.description.clone(),
        description_localizations: None,
        kind: option_type(spec.kind),
        max_length: None,
        max_value: None,
        min_length: None,
        min_value: None,
        name: spec.name.clone(),
        name_localizations: None,
        options: None,
        required: Some(spec.required),
    }
}

fn option_type(kind: OptionType) -> CommandOptionType {
    match kind {
        OptionType::String => CommandOptionType::String,
        OptionType::Integer => CommandOptionType::Integer,
        OptionType::Boolean => CommandOptionType::Boolean,
        OptionType::User => CommandOptionType::User,
        OptionType::Channel => CommandOptionType::Channel,
        OptionType::Role => CommandOptionType::Role,
        OptionType::Mentionable => CommandOptionType::Mentionable,
        OptionType::Number => CommandOptionType::Number,
        OptionType::Attachment => CommandOptionType::Attachment,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::make_move::{make_move_button, move_form};
    use crate::interaction::InteractionKind;
    use serde_json::{json, Value};

    // -- inbound interactions ----------------------------------------------

    fn user(id: &str, name: &str) -> Value {
        json!({
            "id": id,
            "username": name,
            "discriminator": "0",
            "avatar": null,
            "global_name": null,
        })
    }

    fn guild_member(user: Value) -> Value {
        json!({
            "deaf": false,
            "mute": false,
            "flags": 0,
            "joined_at": "2021-01-01T00:00:00.000000+00:00",
            "roles": [],
            "permissions": "0",
            "user": user,
        })
    }

    /// A DM interaction from user 43 unless the caller swaps the invoker.
    fn raw_interaction(kind: u8, data: Option<Value>) -> Value {
        let mut raw = json!({
            "id": "1000",
            "application_id": "2000",
            "type": kind,
            "token": "interaction-token",
            "version": 1,
            "locale": "en-US",
            "entitlements": [],
            "authorizing_integration_owners": {},
            "user": user("43", "bob"),
        });
        if let Some(data) = data {
            raw["data"] = data;
        }
        raw
    }

    fn in_guild(mut raw: Value, member: Value) -> Value {
        let object = raw.as_object_mut().expect("object");
        object.remove("user");
        object.insert("guild_id".to_string(), json!("4000"));
        object.insert("member".to_string(), member);
        raw
    }

    fn parse(raw: Value) -> Interaction {
        serde_json::from_value(raw).expect("valid interaction payload")
    }

    fn play_command() -> Value {
        json!({
            "id": "5000",
            "name": "play",
            "type": 1,
            "options": [{ "name": "opponent", "type": 6, "value": "7" }],
        })
    }

    fn move_submission() -> Value {
        json!({
            "custom_id": "moveModal:42",
            "components": [
                {
                    "type": 1,
                    "id": 1,
                    "components": [
                        { "type": 4, "id": 2, "custom_id": "oldPosition", "value": "e2" }
                    ],
                },
                {
                    "type": 1,
                    "id": 3,
                    "components": [
                        { "type": 4, "id": 4, "custom_id": "newPosition", "value": "e4" }
                    ],
                },
            ],
        })
    }

    #[test]
    fn slash_command_with_user_option() {
        let event = interaction_event(&parse(raw_interaction(2, Some(play_command()))))
            .expect("command event");

        assert_eq!(event.kind, InteractionKind::Command);
        assert_eq!(event.target, "play");
        assert_eq!(event.field("opponent"), Some("7"));
        assert!(event.values.is_empty());
    }

    #[test]
    fn modal_submit_collects_text_inputs_from_rows() {
        let event = interaction_event(&parse(raw_interaction(5, Some(move_submission()))))
            .expect("modal event");

        assert_eq!(event.kind, InteractionKind::ModalSubmit);
        assert_eq!(event.target, "moveModal:42");
        assert_eq!(event.target_argument(), Some("42"));
        assert_eq!(event.field("oldPosition"), Some("e2"));
        assert_eq!(event.field("newPosition"), Some("e4"));
        assert_eq!(event.fields.len(), 2);
    }

    #[test]
    fn button_press_carries_custom_id() {
        let data = json!({ "custom_id": "makeMove:42", "component_type": 2, "values": [] });
        let event = interaction_event(&parse(raw_interaction(3, Some(data))))
            .expect("component event");

        assert_eq!(event.kind, InteractionKind::Component);
        assert_eq!(event.target, "makeMove:42");
    }

    #[test]
    fn guild_user_comes_from_member() {
        let raw = in_guild(
            raw_interaction(2, Some(play_command())),
            guild_member(user("42", "alice")),
        );
        let event = interaction_event(&parse(raw)).expect("command event");

        assert_eq!(event.user_id, Some(42));
        assert_eq!(event.user_mention().as_deref(), Some("<@42>"));
    }

    #[test]
    fn dm_user_comes_from_top_level_user() {
        let event = interaction_event(&parse(raw_interaction(5, Some(move_submission()))))
            .expect("modal event");

        assert_eq!(event.user_id, Some(43));
    }

    #[test]
    fn ping_is_ignored() {
        assert!(interaction_event(&parse(raw_interaction(1, None))).is_none());
    }

    #[test]
    fn autocomplete_is_ignored() {
        let data = json!({
            "id": "5000",
            "name": "play",
            "type": 1,
            "options": [{ "name": "opponent", "type": 3, "value": "al", "focused": true }],
        });
        assert!(interaction_event(&parse(raw_interaction(4, Some(data)))).is_none());
    }

    // -- option values -----------------------------------------------------

    #[test]
    fn option_values_render_as_strings() {
        assert_eq!(
            option_value(&CommandOptionValue::String("e4".to_string())).as_deref(),
            Some("e4")
        );
        assert_eq!(
            option_value(&CommandOptionValue::Integer(6)).as_deref(),
            Some("6")
        );
        assert_eq!(
            option_value(&CommandOptionValue::Boolean(true)).as_deref(),
            Some("true")
        );
        assert_eq!(
            option_value(&CommandOptionValue::User(Id::new(42))).as_deref(),
            Some("42")
        );
    }

    #[test]
    fn command_fields_key_by_option_name() {
        let options = vec![CommandDataOption {
            name: "opponent".to_string(),
            value: CommandOptionValue::User(Id::new(7)),
        }];
        let fields = command_fields(&options);
        assert_eq!(fields.get("opponent").map(String::as_str), Some("7"));
    }

    // -- message replies ---------------------------------------------------

    #[test]
    fn plain_reply_is_channel_message() {
        let response = interaction_response(&Reply::Message(MessageReply::new("Pong!")));
        assert_eq!(response.kind, InteractionResponseType::ChannelMessageWithSource);

        let data = response.data.expect("data");
        assert_eq!(data.content.as_deref(), Some("Pong!"));
        assert!(data.components.is_none());
        assert!(data.flags.is_none());
    }

    #[test]
    fn ephemeral_reply_sets_flag() {
        let response = interaction_response(&Reply::Message(MessageReply::ephemeral("psst")));
        assert_eq!(
            response.data.expect("data").flags,
            Some(MessageFlags::EPHEMERAL)
        );
    }

    #[test]
    fn buttons_render_in_one_action_row() {
        let reply = MessageReply::new("Your move").button(make_move_button(Some("1")).unwrap());
        let response = interaction_response(&Reply::Message(reply));
        let components = response.data.expect("data").components.expect("components");

        assert_eq!(components.len(), 1);
        let Component::ActionRow(row) = &components[0] else {
            panic!("expected ActionRow");
        };
        match &row.components[0] {
            Component::Button(b) => {
                assert_eq!(b.custom_id.as_deref(), Some("makeMove:1"));
                assert_eq!(b.label.as_deref(), Some("Make a move"));
                assert_eq!(b.style, ButtonStyle::Primary);
            }
            other => panic!("expected Button, got {other:?}"),
        }
    }

    // -- modals ------------------------------------------------------------

    #[test]
    #[allow(deprecated)]
    fn modal_renders_one_row_per_field() {
        let response = interaction_response(&Reply::Modal(move_form(None).unwrap()));
        assert_eq!(response.kind, InteractionResponseType::Modal);

        let data = response.data.expect("data");
        assert_eq!(data.custom_id.as_deref(), Some("moveModal"));
        assert_eq!(data.title.as_deref(), Some("Make a move"));

        let rows = data.components.expect("components");
        assert_eq!(rows.len(), 2);

        let inputs: Vec<&TextInput> = rows
            .iter()
            .filter_map(|row| match row {
                Component::ActionRow(row) => row.components.first(),
                _ => None,
            })
            .filter_map(|c| match c {
                Component::TextInput(input) => Some(input),
                _ => None,
            })
            .collect();

        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].custom_id, "oldPosition");
        assert_eq!(inputs[0].placeholder.as_deref(), Some("a1"));
        assert_eq!(inputs[0].style, TextInputStyle::Short);
        assert_eq!(inputs[1].custom_id, "newPosition");
        assert_eq!(inputs[1].placeholder.as_deref(), Some("h8"));
        assert_eq!(inputs[1].required, Some(true));
    }

    #[test]
    fn paragraph_field_renders_multi_line_input() {
        let form = ModalForm::new("notes", "Notes")
            .field(TextField::paragraph("comment", "Comment").required(false));
        let response = interaction_response(&Reply::Modal(form));
        let rows = response.data.expect("data").components.expect("components");

        let Component::ActionRow(row) = &rows[0] else {
            panic!("expected ActionRow");
        };
        match &row.components[0] {
            Component::TextInput(input) => {
                assert_eq!(input.style, TextInputStyle::Paragraph);
                assert_eq!(input.required, Some(false));
                assert!(input.placeholder.is_none());
            }
            other => panic!("expected TextInput, got {other:?}"),
        }
    }

    // -- registration ------------------------------------------------------

    #[test]
    fn descriptor_becomes_chat_input_command() {
        let descriptor = CommandDescriptor::new("play", "Start a game of chess")
            .option(OptionSpec::new(OptionType::User, "opponent", "Who to challenge"));
        let command = application_command(&descriptor);

        assert_eq!(command.name, "play");
        assert_eq!(command.description, "Start a game of chess");
        assert_eq!(command.kind, CommandType::ChatInput);
        assert_eq!(command.options.len(), 1);
        assert_eq!(command.options[0].name, "opponent");
        assert_eq!(command.options[0].kind, CommandOptionType::User);
        assert_eq!(command.options[0].required, Some(false));
    }

    #[test]
    fn every_option_type_maps() {
        for (ours, theirs) in [
            (OptionType::String, CommandOptionType::String),
            (OptionType::Integer, CommandOptionType::Integer),
            (OptionType::Boolean, CommandOptionType::Boolean),
            (OptionType::User, CommandOptionType::User),
            (OptionType::Channel, CommandOptionType::Channel),
            (OptionType::Role, CommandOptionType::Role),
            (OptionType::Mentionable, CommandOptionType::Mentionable),
            (OptionType::Number, CommandOptionType::Number),
            (OptionType::Attachment, CommandOptionType::Attachment),
        ] {
            assert_eq!(option_type(ours), theirs);
        }
    }
}
