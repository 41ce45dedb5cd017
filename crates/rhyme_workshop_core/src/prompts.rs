//! crates/rhyme_workshop_core/src/prompts.rs
//!
//! Prompt templates sent to the text generator. Placeholders in braces are
//! substituted by `fill` before the call.

pub const THEMES_TEMPLATE: &str = r#"Você ajuda jovens escritores de 11 a 13 anos a encontrar ideias para poemas.

O aluno escreveu o que gosta:
"{interest}"

Crie 10 temas de poema ligados DIRETAMENTE ao que ele escreveu.
Cada tema deve ser concreto, curto e animador.

Responda APENAS com um array JSON de 10 strings, sem nenhum outro texto."#;

pub const PROGRESSION_TEMPLATE: &str = r#"Você é um professor de escrita criativa guiando um aluno de 11 a 13 anos que tem pouco contato com poesia.

O tema do poema é "{theme}".

Escreva 10 ideias para ajudar o aluno a avançar no poema:
- ideias concretas, com um toque de lirismo;
- convide a pensar em cheiros, sons, cores e sensações do tema;
- vocabulário simples que desperte a imaginação;
- cada ideia é uma pergunta ou um desafio criativo;
- NÃO escreva versos, apenas ideias.

Responda APENAS com um array JSON de 10 strings."#;

pub const RHYMES_TEMPLATE: &str = r#"Você é especialista em fonética do português brasileiro.

Liste palavras que rimam foneticamente com "{word}". Regras obrigatórias:
1. A sílaba tônica precisa soar igual; esta é a regra mais importante.
2. A vogal tônica precisa ter o mesmo timbre (aberto ou fechado): "verde" não rima com "ferve".
3. Monossílabos tônicos só rimam com outros monossílabos tônicos ou com a sílaba final de oxítonas ("lá", "cá", "maracujá").

Se as regras permitirem, prefira palavras ligadas ao tema "{theme}".

Responda APENAS com um array JSON de pelo menos 8 objetos no formato
{"word": "...", "definition": "..."}, com definições curtas e simples para uma criança de 11 anos."#;

pub const ISSUES_TEMPLATE: &str = r#"Você é um professor de português paciente revisando o rascunho do poema de um aluno de 11 a 13 anos.
O aluno pode usar gírias ou errar a digitação (por exemplo "torar" querendo dizer "torrar", "ten" querendo dizer "tem").

Leia o poema inteiro para entender o contexto e aponte apenas problemas de ortografia e de letras maiúsculas:
1. Ignore a pontuação; poemas têm liberdade poética.
2. As sugestões precisam fazer sentido na frase.
3. Para cada problema, dê até 3 correções, a mais provável primeiro.
4. Explique cada problema com um motivo curto e educativo.

Cada linha do poema abaixo começa com o seu número:
---
{poem}
---

Responda APENAS com um array JSON de objetos no formato
{"original": "...", "suggestions": ["..."], "reason": "...", "verseNumber": N}.
Se não houver problemas, responda []."#;

pub const STYLE_TEMPLATE: &str = r#"Você é diretor de arte e vai montar o layout de um poema infantil.

O tema é "{theme}". O poema:
---
{poem}
---

Responda APENAS com um objeto JSON com estas chaves:
- "font": uma entre "Courier", "Helvetica", "Times";
- "backgroundColorHex": cor de fundo suave, no formato #RRGGBB;
- "textColorHex": cor do texto que contraste com o fundo;
- "titleColorHex": cor de destaque para o título;
- "borderColorHex": cor da borda;
- "borderStyle": um entre "simples", "dupla", "estrelas";
- "iconName": um entre {icons}, combinando com o tema."#;

/// Substitutes `{key}` placeholders in a single pass, so text inserted for
/// one key is never scanned for another. Braces that do not name a key are
/// copied as they are.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let placeholder = values
            .iter()
            .find(|(key, _)| tail.starts_with(key) && tail[key.len()..].starts_with('}'));
        match placeholder {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}
